//! The MIX register file.
//!
//! rA and rX are full words.  The six index registers are semantically
//! two bytes plus sign, but they are held as full words here: user
//! code can deposit a wide value in one with LDi, and field operations
//! treat them like any other word.  The value-setter used by tests and
//! embedders does validate the two-byte magnitude.  rJ is a two-byte
//! unsigned register which only jump instructions write.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use base::prelude::{Sign, Word, MAX_ADDRESS};

use crate::error::ExecError;

/// The comparison indicator, set by the CMP family and consulted by
/// the conditional jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Less,
    Equal,
    Greater,
}

impl From<Ordering> for Comparison {
    fn from(ord: Ordering) -> Comparison {
        match ord {
            Ordering::Less => Comparison::Less,
            Ordering::Equal => Comparison::Equal,
            Ordering::Greater => Comparison::Greater,
        }
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(match self {
            Comparison::Less => "LESS",
            Comparison::Equal => "EQUAL",
            Comparison::Greater => "GREATER",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Registers {
    pub a: Word,
    pub x: Word,
    i: [Word; 6],
    j: u16,
    pub overflow: bool,
    pub comparison: Comparison,
}

impl Registers {
    pub fn new() -> Registers {
        Registers {
            a: Word::ZERO,
            x: Word::ZERO,
            i: [Word::ZERO; 6],
            j: 0,
            overflow: false,
            comparison: Comparison::Equal,
        }
    }

    pub fn reset(&mut self) {
        *self = Registers::new();
    }

    /// Index register `n`, 1-based.
    pub fn index(&self, n: u8) -> Word {
        assert!((1..=6).contains(&n), "index register {n} out of range");
        self.i[usize::from(n) - 1]
    }

    /// Overwrite index register `n` with an arbitrary word.  This is
    /// the LDi path; the hardware model permits values wider than two
    /// bytes to arrive this way.
    pub fn set_index(&mut self, n: u8, w: Word) {
        assert!((1..=6).contains(&n), "index register {n} out of range");
        self.i[usize::from(n) - 1] = w;
    }

    pub fn index_value(&self, n: u8) -> i64 {
        self.index(n).to_i64()
    }

    /// Set index register `n` from an integer, enforcing the two-byte
    /// capacity.  Wide values can only enter an index register through
    /// LDi from memory, never through this setter.
    pub fn set_index_value(&mut self, n: u8, value: i64) -> Result<(), ExecError> {
        if value.abs() > MAX_ADDRESS {
            return Err(ExecError::AddressOutOfRange(value));
        }
        self.set_index(n, Word::from_i64(value).expect("value checked against capacity"));
        Ok(())
    }

    /// The jump register, 0..=4095, unsigned.
    pub fn j(&self) -> u16 {
        self.j
    }

    pub(crate) fn set_j(&mut self, pc: u16) {
        self.j = pc;
    }

    /// rJ rendered as a positive word with the value in bytes 4 and 5,
    /// the shape STJ stores.
    pub fn j_word(&self) -> Word {
        Word::from_sign_magnitude(Sign::Plus, i64::from(self.j))
            .expect("rJ fits in two bytes")
    }
}

impl Default for Registers {
    fn default() -> Registers {
        Registers::new()
    }
}
