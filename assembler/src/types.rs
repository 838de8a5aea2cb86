//! Assembly failure types.
//!
//! Every failure carries the 1-based source line it arose on; the
//! `Display` form leads with it so that CLI diagnostics begin with the
//! offending line.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use base::prelude::WordError;

/// What went wrong, independent of where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmErrorKind {
    /// Text the lexer cannot tokenize.
    Lex(String),
    /// A line that does not fit the grammar.
    Parse(String),
    /// An operation field naming no known mnemonic or pseudo-op.
    UnknownMnemonic(String),
    /// A second definition of an already-defined symbol.
    DuplicateSymbol(String),
    /// A reference to a symbol with no definition.
    UndefinedSymbol(String),
    /// An expression that cannot be evaluated.
    Expression(String),
    /// A malformed literal operand.
    Literal(String),
    /// A pseudo-op that requires a label appeared without one.
    MissingLabel(String),
    /// An address value outside the 12-bit instruction field.
    AddressRange(i64),
    /// An index value outside 0..=6.
    IndexRange(i64),
    /// A field value outside one byte.
    FieldRange(i64),
    /// The location counter left the machine's memory.
    OriginRange(i64),
    /// A value that does not fit in a word, or a bad field pair.
    Word(WordError),
}

impl Display for AsmErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            AsmErrorKind::Lex(text) => write!(f, "unrecognised text {text}"),
            AsmErrorKind::Parse(msg) => write!(f, "{msg}"),
            AsmErrorKind::UnknownMnemonic(name) => {
                write!(f, "'{name}' is not a MIX operation or pseudo-operation")
            }
            AsmErrorKind::DuplicateSymbol(name) => {
                write!(f, "symbol '{name}' is already defined")
            }
            AsmErrorKind::UndefinedSymbol(name) => {
                write!(f, "symbol '{name}' is not defined")
            }
            AsmErrorKind::Expression(msg) => write!(f, "bad expression: {msg}"),
            AsmErrorKind::Literal(msg) => write!(f, "bad literal: {msg}"),
            AsmErrorKind::MissingLabel(op) => write!(f, "{op} requires a label"),
            AsmErrorKind::AddressRange(value) => {
                write!(f, "address {value} does not fit in two bytes")
            }
            AsmErrorKind::IndexRange(value) => {
                write!(f, "index {value} is not an index register number")
            }
            AsmErrorKind::FieldRange(value) => {
                write!(f, "field value {value} does not fit in one byte")
            }
            AsmErrorKind::OriginRange(value) => {
                write!(f, "location {value} is outside the machine's memory")
            }
            AsmErrorKind::Word(e) => write!(f, "{e}"),
        }
    }
}

impl From<WordError> for AsmErrorKind {
    fn from(e: WordError) -> AsmErrorKind {
        AsmErrorKind::Word(e)
    }
}

/// An assembly failure located on a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmError {
    pub line: u32,
    pub kind: AsmErrorKind,
}

impl AsmError {
    pub fn new(line: u32, kind: AsmErrorKind) -> AsmError {
        AsmError { line, kind }
    }
}

impl Display for AsmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl Error for AsmError {}
