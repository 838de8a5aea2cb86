//! A two-pass assembler for MIXAL, the MIX assembly language.
//!
//! Source text goes through the line lexer, the statement parser, and
//! the two-pass driver; the result is a complete 4000-word memory
//! image plus the program's entry address, which `output` can
//! serialize for a later `run`.

mod ast;
mod driver;
mod eval;
mod lexer;
pub mod output;
mod parser;
mod symtab;
mod types;

pub use driver::{assemble, Assembly};
pub use output::{read_image, write_image, ImageError};
pub use symtab::SymbolTable;
pub use types::{AsmError, AsmErrorKind};
