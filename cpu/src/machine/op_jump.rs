//! The jump families: opcode 39 (conditions on the machine state) and
//! opcodes 40..=47 (sign tests on a register).
//!
//! Every taken jump except JSJ records the would-have-been-next
//! program counter in rJ before redirecting.  The fetch loop has
//! already incremented the counter when an instruction executes, so
//! the value saved is simply the current counter.  A conditional jump
//! that does not fire changes nothing at all.

use tracing::{event, Level};

use base::prelude::MEMORY_SIZE;

use crate::decode::{JumpCondition, RegId, SignCondition};
use crate::error::ExecError;
use crate::machine::Machine;
use crate::registers::Comparison;

impl Machine {
    /// Redirect the program counter, optionally saving it in rJ
    /// first.  The target must name a memory cell.
    fn jump_to(&mut self, m: i64, save_j: bool) -> Result<(), ExecError> {
        if !(0..MEMORY_SIZE as i64).contains(&m) {
            return Err(ExecError::AddressOutOfRange(m));
        }
        if save_j {
            self.regs.set_j(self.pc());
        }
        event!(Level::TRACE, "jump to {m}");
        self.set_pc(m as u16);
        Ok(())
    }

    pub(crate) fn op_jump(&mut self, condition: JumpCondition, m: i64) -> Result<(), ExecError> {
        let (jump, save_j) = match condition {
            JumpCondition::Always => (true, true),
            JumpCondition::WithoutJ => (true, false),
            // JOV and JNOV consume the toggle either way.
            JumpCondition::OnOverflow => {
                let was_set = self.regs.overflow;
                self.regs.overflow = false;
                (was_set, true)
            }
            JumpCondition::OnNoOverflow => {
                let was_set = self.regs.overflow;
                self.regs.overflow = false;
                (!was_set, true)
            }
            JumpCondition::Less => (self.regs.comparison == Comparison::Less, true),
            JumpCondition::Equal => (self.regs.comparison == Comparison::Equal, true),
            JumpCondition::Greater => (self.regs.comparison == Comparison::Greater, true),
            JumpCondition::GreaterOrEqual => (self.regs.comparison != Comparison::Less, true),
            JumpCondition::Unequal => (self.regs.comparison != Comparison::Equal, true),
            JumpCondition::LessOrEqual => (self.regs.comparison != Comparison::Greater, true),
        };
        if jump {
            self.jump_to(m, save_j)
        } else {
            Ok(())
        }
    }

    pub(crate) fn op_jump_sign(
        &mut self,
        reg: RegId,
        condition: SignCondition,
        m: i64,
    ) -> Result<(), ExecError> {
        let value = match reg {
            RegId::A => self.regs.a.to_i64(),
            RegId::X => self.regs.x.to_i64(),
            RegId::I(n) => self.regs.index_value(n),
        };
        let jump = match condition {
            SignCondition::Negative => value < 0,
            SignCondition::Zero => value == 0,
            SignCondition::Positive => value > 0,
            SignCondition::NonNegative => value >= 0,
            SignCondition::NonZero => value != 0,
            SignCondition::NonPositive => value <= 0,
        };
        if jump {
            self.jump_to(m, true)
        } else {
            Ok(())
        }
    }
}
