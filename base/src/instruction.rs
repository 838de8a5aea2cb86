//! Binary and symbolic representations of MIX instructions.
//!
//! An instruction occupies one word.  With the sign and the five bytes
//! written `S b1 b2 b3 b4 b5`:
//!
//! | part  | meaning                                    |
//! |-------|--------------------------------------------|
//! | S     | sign of the address field                  |
//! | b1,b2 | address magnitude `AA = b1*64 + b2` (0..=4095) |
//! | b3    | index register number `I` (valid 0..=6)    |
//! | b4    | field / modifier byte `F`                  |
//! | b5    | opcode `C`                                 |
//!
//! Any word decodes to *some* instruction; whether the opcode, field
//! and index are meaningful is decided by the execution engine.  The
//! codec here is therefore infallible in both directions and
//! round-trips exactly.
//!
//! This module also carries the mnemonic table shared by the assembler
//! and by diagnostics: each MIXAL mnemonic maps to an opcode and the
//! default field byte that applies when an instruction carries no
//! explicit field specification.

use crate::word::{Sign, Word};

#[cfg(test)]
use test_strategy::{proptest, Arbitrary};

/// A MIX instruction broken into its component fields.
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub sign: Sign,
    /// Address magnitude, 0..=4095.
    #[cfg_attr(test, strategy(0u16..4096))]
    pub address: u16,
    /// Index register number as stored; only 0..=6 is executable.
    #[cfg_attr(test, strategy(0u8..64))]
    pub index: u8,
    /// Field byte, usually a packed `(L:R)` pair.
    #[cfg_attr(test, strategy(0u8..64))]
    pub field: u8,
    /// Operation code.
    #[cfg_attr(test, strategy(0u8..64))]
    pub opcode: u8,
}

impl Instruction {
    /// Pack into a word.  Out-of-range field values are masked to
    /// their byte width, so this cannot fail.
    pub fn to_word(&self) -> Word {
        let bytes = [
            ((self.address >> 6) & 63) as u8,
            (self.address & 63) as u8,
            self.index & 63,
            self.field & 63,
            self.opcode & 63,
        ];
        Word::new(self.sign, bytes).expect("bytes masked into range")
    }

    /// The signed address operand, before indexing.
    pub fn signed_address(&self) -> i64 {
        i64::from(self.sign) * i64::from(self.address)
    }
}

impl From<&Word> for Instruction {
    fn from(w: &Word) -> Instruction {
        let b = w.bytes();
        Instruction {
            sign: w.sign(),
            address: u16::from(b[0]) * 64 + u16::from(b[1]),
            index: b[2],
            field: b[3],
            opcode: b[4],
        }
    }
}

/// Opcode and default field of a MIXAL mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpSpec {
    pub opcode: u8,
    pub field: u8,
}

// One row per mnemonic.  The register families (LD*, ST*, J**, ENT*,
// CMP*) are laid out register by register so that the whole table can
// be read against the opcode map in one pass.
const MNEMONICS: &[(&str, u8, u8)] = &[
    ("NOP", 0, 0),
    ("ADD", 1, 5),
    ("SUB", 2, 5),
    ("MUL", 3, 5),
    ("DIV", 4, 5),
    ("NUM", 5, 0),
    ("CHAR", 5, 1),
    ("HLT", 5, 2),
    ("SLA", 6, 0),
    ("SRA", 6, 1),
    ("SLAX", 6, 2),
    ("SRAX", 6, 3),
    ("SLC", 6, 4),
    ("SRC", 6, 5),
    ("MOVE", 7, 1),
    ("LDA", 8, 5),
    ("LD1", 9, 5),
    ("LD2", 10, 5),
    ("LD3", 11, 5),
    ("LD4", 12, 5),
    ("LD5", 13, 5),
    ("LD6", 14, 5),
    ("LDX", 15, 5),
    ("LDAN", 16, 5),
    ("LD1N", 17, 5),
    ("LD2N", 18, 5),
    ("LD3N", 19, 5),
    ("LD4N", 20, 5),
    ("LD5N", 21, 5),
    ("LD6N", 22, 5),
    ("LDXN", 23, 5),
    ("STA", 24, 5),
    ("ST1", 25, 5),
    ("ST2", 26, 5),
    ("ST3", 27, 5),
    ("ST4", 28, 5),
    ("ST5", 29, 5),
    ("ST6", 30, 5),
    ("STX", 31, 5),
    ("STJ", 32, 2),
    ("STZ", 33, 5),
    ("JBUS", 34, 0),
    ("IOC", 35, 0),
    ("IN", 36, 0),
    ("OUT", 37, 0),
    ("JRED", 38, 0),
    ("JMP", 39, 0),
    ("JSJ", 39, 1),
    ("JOV", 39, 2),
    ("JNOV", 39, 3),
    ("JL", 39, 4),
    ("JE", 39, 5),
    ("JG", 39, 6),
    ("JGE", 39, 7),
    ("JNE", 39, 8),
    ("JLE", 39, 9),
    ("JAN", 40, 0),
    ("JAZ", 40, 1),
    ("JAP", 40, 2),
    ("JANN", 40, 3),
    ("JANZ", 40, 4),
    ("JANP", 40, 5),
    ("J1N", 41, 0),
    ("J1Z", 41, 1),
    ("J1P", 41, 2),
    ("J1NN", 41, 3),
    ("J1NZ", 41, 4),
    ("J1NP", 41, 5),
    ("J2N", 42, 0),
    ("J2Z", 42, 1),
    ("J2P", 42, 2),
    ("J2NN", 42, 3),
    ("J2NZ", 42, 4),
    ("J2NP", 42, 5),
    ("J3N", 43, 0),
    ("J3Z", 43, 1),
    ("J3P", 43, 2),
    ("J3NN", 43, 3),
    ("J3NZ", 43, 4),
    ("J3NP", 43, 5),
    ("J4N", 44, 0),
    ("J4Z", 44, 1),
    ("J4P", 44, 2),
    ("J4NN", 44, 3),
    ("J4NZ", 44, 4),
    ("J4NP", 44, 5),
    ("J5N", 45, 0),
    ("J5Z", 45, 1),
    ("J5P", 45, 2),
    ("J5NN", 45, 3),
    ("J5NZ", 45, 4),
    ("J5NP", 45, 5),
    ("J6N", 46, 0),
    ("J6Z", 46, 1),
    ("J6P", 46, 2),
    ("J6NN", 46, 3),
    ("J6NZ", 46, 4),
    ("J6NP", 46, 5),
    ("JXN", 47, 0),
    ("JXZ", 47, 1),
    ("JXP", 47, 2),
    ("JXNN", 47, 3),
    ("JXNZ", 47, 4),
    ("JXNP", 47, 5),
    ("ENTA", 48, 0),
    ("ENNA", 48, 1),
    ("INCA", 48, 2),
    ("DECA", 48, 3),
    ("ENT1", 49, 0),
    ("ENN1", 49, 1),
    ("INC1", 49, 2),
    ("DEC1", 49, 3),
    ("ENT2", 50, 0),
    ("ENN2", 50, 1),
    ("INC2", 50, 2),
    ("DEC2", 50, 3),
    ("ENT3", 51, 0),
    ("ENN3", 51, 1),
    ("INC3", 51, 2),
    ("DEC3", 51, 3),
    ("ENT4", 52, 0),
    ("ENN4", 52, 1),
    ("INC4", 52, 2),
    ("DEC4", 52, 3),
    ("ENT5", 53, 0),
    ("ENN5", 53, 1),
    ("INC5", 53, 2),
    ("DEC5", 53, 3),
    ("ENT6", 54, 0),
    ("ENN6", 54, 1),
    ("INC6", 54, 2),
    ("DEC6", 54, 3),
    ("ENTX", 55, 0),
    ("ENNX", 55, 1),
    ("INCX", 55, 2),
    ("DECX", 55, 3),
    ("CMPA", 56, 5),
    ("CMP1", 57, 5),
    ("CMP2", 58, 5),
    ("CMP3", 59, 5),
    ("CMP4", 60, 5),
    ("CMP5", 61, 5),
    ("CMP6", 62, 5),
    ("CMPX", 63, 5),
];

/// Look up a MIXAL mnemonic (case-insensitive).
pub fn opcode_for_mnemonic(name: &str) -> Option<OpSpec> {
    let name = name.to_ascii_uppercase();
    MNEMONICS
        .iter()
        .find(|(m, _, _)| *m == name)
        .map(|&(_, opcode, field)| OpSpec { opcode, field })
}
