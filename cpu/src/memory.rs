//! The MIX main memory: exactly 4000 words, addressed 0..=3999.
//!
//! Addresses are carried as `i64` because effective-address
//! computation is signed; any reference outside the machine's range
//! fails with [`ExecError::AddressOutOfRange`].

use tracing::{event, Level};

use base::prelude::{Word, MEMORY_SIZE};

use crate::error::ExecError;

#[derive(Debug, Clone)]
pub struct Memory {
    words: Vec<Word>,
}

impl Memory {
    pub fn new() -> Memory {
        Memory {
            words: vec![Word::ZERO; MEMORY_SIZE],
        }
    }

    fn locate(addr: i64) -> Result<usize, ExecError> {
        if (0..MEMORY_SIZE as i64).contains(&addr) {
            Ok(addr as usize)
        } else {
            Err(ExecError::AddressOutOfRange(addr))
        }
    }

    pub fn fetch(&self, addr: i64) -> Result<Word, ExecError> {
        Ok(self.words[Memory::locate(addr)?])
    }

    pub fn store(&mut self, addr: i64, w: Word) -> Result<(), ExecError> {
        let pos = Memory::locate(addr)?;
        event!(Level::TRACE, "memory store {w} at {addr}");
        self.words[pos] = w;
        Ok(())
    }

    /// Set every word back to +0.
    pub fn reset(&mut self) {
        self.words.fill(Word::ZERO);
    }
}

impl Default for Memory {
    fn default() -> Memory {
        Memory::new()
    }
}
