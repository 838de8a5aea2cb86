use std::error::Error;
use std::fmt::{self, Display, Formatter};

use base::prelude::MEMORY_SIZE;

/// Conditions which are fatal to the current run.
///
/// Soft conditions (arithmetic overflow, division by zero) are not
/// here; they set the machine's overflow toggle and execution
/// continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// A memory reference or register value-setter saw an address
    /// outside the machine's range.
    AddressOutOfRange(i64),
    /// An instruction named an index register above 6.
    InvalidIndex(u8),
    /// The opcode/field combination does not name an operation.
    UnknownOpcode { opcode: u8, field: u8 },
    /// `run` executed this many instructions without reaching HLT.
    InstructionLimitExceeded(u64),
}

impl Display for ExecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            ExecError::AddressOutOfRange(addr) => {
                write!(
                    f,
                    "address {addr} is outside the addressable range 0..{MEMORY_SIZE}"
                )
            }
            ExecError::InvalidIndex(index) => {
                write!(
                    f,
                    "instruction names index register {index}, but only 1..=6 exist"
                )
            }
            ExecError::UnknownOpcode { opcode, field } => {
                write!(f, "no operation has opcode {opcode} with field {field}")
            }
            ExecError::InstructionLimitExceeded(limit) => {
                write!(
                    f,
                    "execution exceeded the ceiling of {limit} instructions without halting"
                )
            }
        }
    }
}

impl Error for ExecError {}
