//! The address-transfer family (opcodes 48..=55): ENTi, ENNi, INCi,
//! DECi.  The operand is `M` itself, used as a signed quantity; no
//! memory access occurs.
//!
//! ENTering zero is sign-sensitive: `ENTA -0` and `ENTA 0` load
//! different words, distinguished by the instruction's own sign.
//! INC/DEC overflow against the target's capacity (a full word for
//! rA/rX, two bytes for an index register) wraps and sets the toggle,
//! and a result that would exceed an index register's capacity via
//! ENT takes the same path.

use base::prelude::{Sign, Word, MAX_ADDRESS, MAX_WORD_VALUE};

use crate::decode::{RegId, TransferKind};
use crate::machine::{reduced_to_capacity, Machine};

impl Machine {
    pub(crate) fn op_transfer(&mut self, reg: RegId, kind: TransferKind, m: i64, inst_sign: Sign) {
        let capacity = match reg {
            RegId::I(_) => MAX_ADDRESS,
            _ => MAX_WORD_VALUE,
        };
        let current = match reg {
            RegId::A => self.regs.a,
            RegId::X => self.regs.x,
            RegId::I(n) => self.regs.index(n),
        };
        let (value, overflowed) = match kind {
            TransferKind::Enter | TransferKind::EnterNegative => {
                let negate = kind == TransferKind::EnterNegative;
                let operand = if negate { -m } else { m };
                if operand == 0 {
                    let sign = if negate {
                        inst_sign.opposite()
                    } else {
                        inst_sign
                    };
                    (
                        Word::from_sign_magnitude(sign, 0).expect("zero always fits"),
                        false,
                    )
                } else {
                    reduced_to_capacity(Sign::of(operand), operand, capacity)
                }
            }
            TransferKind::Increase => {
                reduced_to_capacity(current.sign(), current.to_i64() + m, capacity)
            }
            TransferKind::Decrease => {
                reduced_to_capacity(current.sign(), current.to_i64() - m, capacity)
            }
        };
        match reg {
            RegId::A => self.regs.a = value,
            RegId::X => self.regs.x = value,
            RegId::I(n) => self.regs.set_index(n, value),
        }
        if overflowed {
            self.regs.overflow = true;
        }
    }
}
