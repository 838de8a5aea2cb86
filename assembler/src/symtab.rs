//! The assembler's symbol table.
//!
//! Names are case-insensitive (stored upper-cased).  A symbol has
//! exactly one definition; redefinition is an error, and lookups of
//! undefined names fail at expression evaluation time.

use std::collections::HashMap;

use tracing::{event, Level};

use crate::types::AsmErrorKind;

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    defs: HashMap<String, i64>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    pub fn define(&mut self, name: &str, value: i64) -> Result<(), AsmErrorKind> {
        let key = name.to_ascii_uppercase();
        if self.defs.contains_key(&key) {
            return Err(AsmErrorKind::DuplicateSymbol(key));
        }
        event!(Level::DEBUG, "defining symbol {key} = {value}");
        self.defs.insert(key, value);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<i64> {
        self.defs.get(&name.to_ascii_uppercase()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// All definitions, for listings; unordered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.defs.iter().map(|(name, &value)| (name.as_str(), value))
    }
}
