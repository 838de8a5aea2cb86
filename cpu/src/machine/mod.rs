//! The machine proper: registers plus memory plus the fetch-execute
//! loop.
//!
//! Each step fetches `memory[PC]`, increments the program counter,
//! decodes, and dispatches.  The increment happens before execution so
//! that the jump instructions see the address of the *next*
//! instruction, which is what the J-register discipline stores.
//!
//! The opcode families are implemented in the `op_*` submodules as
//! further `impl Machine` blocks.

use tracing::{event, Level};

use base::prelude::{Instruction, Sign, Word, MEMORY_SIZE};

use crate::decode::{decode, Operation};
use crate::error::ExecError;
use crate::memory::Memory;
use crate::registers::Registers;

mod op_arith;
mod op_io;
mod op_jump;
mod op_loadstore;
mod op_move;
mod op_shift;
mod op_transfer;

/// Ceiling used by [`Machine::run`] to break runaway programs.
pub const DEFAULT_INSTRUCTION_LIMIT: u64 = 50_000_000;

#[derive(Debug, Clone)]
pub struct Machine {
    pub regs: Registers,
    pub memory: Memory,
    pc: u16,
    running: bool,
    executed: u64,
}

impl Machine {
    /// A zeroed machine: registers +0, memory +0, PC 0, running.
    pub fn new() -> Machine {
        Machine {
            regs: Registers::new(),
            memory: Memory::new(),
            pc: 0,
            running: true,
            executed: 0,
        }
    }

    /// Reinitialize everything and return to the running state.
    /// Callers must reset between runs; re-entering `run` on a halted
    /// machine without a reset is a no-op.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.memory.reset();
        self.pc = 0;
        self.running = true;
        self.executed = 0;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub(crate) fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    pub fn is_halted(&self) -> bool {
        !self.running
    }

    pub fn instructions_executed(&self) -> u64 {
        self.executed
    }

    /// Copy an assembled image into memory (from address 0) and point
    /// the program counter at its entry address.
    pub fn load_image(&mut self, image: &[Word], start: u16) -> Result<(), ExecError> {
        if image.len() > MEMORY_SIZE {
            return Err(ExecError::AddressOutOfRange(image.len() as i64));
        }
        for (addr, word) in image.iter().enumerate() {
            self.memory.store(addr as i64, *word)?;
        }
        if usize::from(start) >= MEMORY_SIZE {
            return Err(ExecError::AddressOutOfRange(i64::from(start)));
        }
        self.pc = start;
        self.running = true;
        Ok(())
    }

    /// Execute one instruction.  A no-op once the machine has halted.
    pub fn step(&mut self) -> Result<(), ExecError> {
        if !self.running {
            return Ok(());
        }
        let word = self.memory.fetch(i64::from(self.pc))?;
        let inst = Instruction::from(&word);
        self.pc += 1;
        self.execute_instruction(&inst)
    }

    /// Step until halted, with the default instruction ceiling.
    pub fn run(&mut self) -> Result<(), ExecError> {
        self.run_with_limit(DEFAULT_INSTRUCTION_LIMIT)
    }

    /// Step until halted or until `limit` instructions have executed.
    pub fn run_with_limit(&mut self, limit: u64) -> Result<(), ExecError> {
        let mut count: u64 = 0;
        while self.running {
            if count == limit {
                return Err(ExecError::InstructionLimitExceeded(limit));
            }
            self.step()?;
            count += 1;
        }
        Ok(())
    }

    pub(crate) fn execute_instruction(&mut self, inst: &Instruction) -> Result<(), ExecError> {
        let op = decode(inst)?;
        self.executed += 1;
        let m = self.effective_address(inst);
        event!(Level::TRACE, "executing {op:?} with M={m}");
        match op {
            Operation::Nop => Ok(()),
            Operation::Add(field) => self.op_add(m, field, false),
            Operation::Sub(field) => self.op_add(m, field, true),
            Operation::Mul(field) => self.op_mul(m, field),
            Operation::Div(field) => self.op_div(m, field),
            Operation::Num => {
                self.op_num();
                Ok(())
            }
            Operation::Char => {
                self.op_char();
                Ok(())
            }
            Operation::Halt => {
                event!(Level::DEBUG, "HLT at {}", self.pc.wrapping_sub(1));
                self.running = false;
                Ok(())
            }
            Operation::Shift(kind) => {
                self.op_shift(kind, m);
                Ok(())
            }
            Operation::Move { count } => self.op_move(m, count),
            Operation::Load {
                target,
                field,
                negate,
            } => self.op_load(target, field, negate, m),
            Operation::Store { source, field } => self.op_store(source, field, m),
            Operation::JumpBusy { unit } => {
                self.op_jump_busy(unit);
                Ok(())
            }
            Operation::IoControl { unit } => {
                self.op_io_control(unit);
                Ok(())
            }
            Operation::Input { unit } => {
                self.op_input(unit, m);
                Ok(())
            }
            Operation::Output { unit } => {
                self.op_output(unit, m);
                Ok(())
            }
            Operation::JumpReady { unit } => self.op_jump_ready(unit, m),
            Operation::Jump(condition) => self.op_jump(condition, m),
            Operation::JumpSign { reg, condition } => self.op_jump_sign(reg, condition, m),
            Operation::Transfer { reg, kind } => {
                self.op_transfer(reg, kind, m, inst.sign);
                Ok(())
            }
            Operation::Compare { reg, field } => self.op_compare(reg, field, m),
        }
    }

    /// The effective operand address `M`: the signed address field
    /// plus the named index register's value.
    fn effective_address(&self, inst: &Instruction) -> i64 {
        let base = inst.signed_address();
        if inst.index == 0 {
            base
        } else {
            base + self.regs.index_value(inst.index)
        }
    }
}

impl Default for Machine {
    fn default() -> Machine {
        Machine::new()
    }
}

/// Fit a computed value into a register of the given capacity.
///
/// A zero value takes `zero_sign` (MIX keeps the register's previous
/// sign when an addition's magnitude reaches zero).  A value beyond
/// the capacity is reduced modulo `capacity + 1`, keeps its computed
/// sign, and reports overflow.
pub(crate) fn reduced_to_capacity(zero_sign: Sign, value: i64, capacity: i64) -> (Word, bool) {
    if value == 0 {
        (
            Word::from_sign_magnitude(zero_sign, 0).expect("zero always fits"),
            false,
        )
    } else if value.abs() > capacity {
        let magnitude = value.abs() % (capacity + 1);
        (
            Word::from_sign_magnitude(Sign::of(value), magnitude)
                .expect("magnitude reduced modulo the capacity"),
            true,
        )
    } else {
        (Word::from_i64(value).expect("value within capacity"), false)
    }
}
