//! MOVE (opcode 7): copy F consecutive words from M onward to the
//! addresses starting at rI1's value.
//!
//! The copy proceeds word by word in ascending order, so an
//! overlapping move with the destination above the source propagates
//! the first word through the overlap, which programs exploit to fill
//! a region.  rI1 ends up incremented by F.

use base::prelude::MAX_ADDRESS;

use crate::error::ExecError;
use crate::machine::{reduced_to_capacity, Machine};

impl Machine {
    pub(crate) fn op_move(&mut self, m: i64, count: u8) -> Result<(), ExecError> {
        if count == 0 {
            return Ok(());
        }
        let dest = self.regs.index_value(1);
        for k in 0..i64::from(count) {
            let word = self.memory.fetch(m + k)?;
            self.memory.store(dest + k, word)?;
        }
        let (updated, overflowed) = reduced_to_capacity(
            self.regs.index(1).sign(),
            dest + i64::from(count),
            MAX_ADDRESS,
        );
        self.regs.set_index(1, updated);
        if overflowed {
            self.regs.overflow = true;
        }
        Ok(())
    }
}
