//! The input/output opcodes (34..=38).
//!
//! Device emulation is out of scope for this machine; the contract is
//! that every device is permanently ready.  IN, OUT and IOC therefore
//! do nothing, JBUS (jump if busy) never jumps, and JRED (jump if
//! ready) always jumps, with the usual rJ discipline.

use tracing::{event, Level};

use crate::error::ExecError;
use crate::machine::Machine;

impl Machine {
    pub(crate) fn op_input(&mut self, unit: u8, m: i64) {
        event!(
            Level::DEBUG,
            "IN for unit {unit} at {m} ignored; no devices are attached"
        );
    }

    pub(crate) fn op_output(&mut self, unit: u8, m: i64) {
        event!(
            Level::DEBUG,
            "OUT for unit {unit} at {m} ignored; no devices are attached"
        );
    }

    pub(crate) fn op_io_control(&mut self, unit: u8) {
        event!(
            Level::DEBUG,
            "IOC for unit {unit} ignored; no devices are attached"
        );
    }

    pub(crate) fn op_jump_busy(&mut self, unit: u8) {
        event!(Level::TRACE, "JBUS: unit {unit} is never busy");
    }

    pub(crate) fn op_jump_ready(&mut self, unit: u8, m: i64) -> Result<(), ExecError> {
        event!(Level::TRACE, "JRED: unit {unit} is always ready");
        self.op_jump(crate::decode::JumpCondition::Always, m)
    }
}
