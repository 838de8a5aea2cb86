//! Parsed representation of a MIXAL program: one statement per
//! non-comment source line.
//!
//! The expression grammar is deliberately restricted: an expression is
//! at most two terms joined by `+` or `-`, where a term is an integer,
//! a symbol, or `*` (the current location counter).  That covers the
//! forms `N`, `SYM`, `SYM+N`, `N-SYM`, `SYM-SYM`, `*`, `*+N` and their
//! signed variants.

use std::fmt::{self, Display, Formatter};

use base::prelude::OpSpec;

/// The five pseudo-operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PseudoOp {
    Orig,
    Equ,
    Con,
    Alf,
    End,
}

impl PseudoOp {
    pub(crate) fn from_name(name: &str) -> Option<PseudoOp> {
        match name.to_ascii_uppercase().as_str() {
            "ORIG" => Some(PseudoOp::Orig),
            "EQU" => Some(PseudoOp::Equ),
            "CON" => Some(PseudoOp::Con),
            "ALF" => Some(PseudoOp::Alf),
            "END" => Some(PseudoOp::End),
            _ => None,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            PseudoOp::Orig => "ORIG",
            PseudoOp::Equ => "EQU",
            PseudoOp::Con => "CON",
            PseudoOp::Alf => "ALF",
            PseudoOp::End => "END",
        }
    }
}

/// A single expression term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Atom {
    Number(i64),
    Symbol(String),
    /// `*`, the location counter.
    Here,
}

impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Atom::Number(n) => write!(f, "{n}"),
            Atom::Symbol(name) => f.write_str(name),
            Atom::Here => f.write_str("*"),
        }
    }
}

/// One or two signed terms.  The coefficient of each term is +1 or -1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Expr {
    pub terms: Vec<(i64, Atom)>,
}

impl Expr {
    #[cfg(test)]
    pub(crate) fn single(atom: Atom) -> Expr {
        Expr {
            terms: vec![(1, atom)],
        }
    }
}

/// The canonical rendering; the literal pool interns by this, so
/// `=42=` and `= 42 =` share a slot while `=42+0=` does not.
impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        for (i, (coefficient, atom)) in self.terms.iter().enumerate() {
            if *coefficient < 0 {
                f.write_str("-")?;
            } else if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{atom}")?;
        }
        Ok(())
    }
}

/// The address part of an instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AddressArg {
    Expr(Expr),
    /// `=expr=`: the address of the interned pool slot.
    Literal(Expr),
}

/// The parenthesized field part: either a packed value or `L:R`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldArg {
    Single(Expr),
    Pair(Expr, Expr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InstructionNode {
    pub label: Option<String>,
    pub mnemonic: String,
    pub spec: OpSpec,
    pub address: Option<AddressArg>,
    pub index: Option<Expr>,
    pub field: Option<FieldArg>,
    pub line: u32,
}

/// The operand of a pseudo-op: absent (END may omit it), an
/// expression, or raw ALF text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PseudoOperand {
    None,
    Expr(Expr),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PseudoNode {
    pub label: Option<String>,
    pub op: PseudoOp,
    pub operand: PseudoOperand,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Statement {
    Instruction(InstructionNode),
    Pseudo(PseudoNode),
}

impl Statement {
    pub(crate) fn line(&self) -> u32 {
        match self {
            Statement::Instruction(node) => node.line,
            Statement::Pseudo(node) => node.line,
        }
    }

    #[cfg(test)]
    pub(crate) fn label(&self) -> Option<&str> {
        match self {
            Statement::Instruction(node) => node.label.as_deref(),
            Statement::Pseudo(node) => node.label.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_names() {
        for op in [
            PseudoOp::Orig,
            PseudoOp::Equ,
            PseudoOp::Con,
            PseudoOp::Alf,
            PseudoOp::End,
        ] {
            assert_eq!(PseudoOp::from_name(op.name()), Some(op));
        }
        assert_eq!(PseudoOp::from_name("equ"), Some(PseudoOp::Equ));
        assert_eq!(PseudoOp::from_name("LDA"), None);
    }

    #[test]
    fn test_expr_canonical_text() {
        let e = Expr {
            terms: vec![(1, Atom::Symbol("TOP".to_string())), (-1, Atom::Number(3))],
        };
        assert_eq!(e.to_string(), "TOP-3");

        let e = Expr {
            terms: vec![(-1, Atom::Number(5))],
        };
        assert_eq!(e.to_string(), "-5");

        let e = Expr {
            terms: vec![(1, Atom::Here), (1, Atom::Number(2))],
        };
        assert_eq!(e.to_string(), "*+2");
    }
}
