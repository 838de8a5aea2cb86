//! Expression evaluation against the symbol table.
//!
//! `*` evaluates to the caller-supplied location: the current location
//! counter during pass 1, the emission address during pass 2, and 0
//! for the END operand.

use crate::ast::{Atom, Expr};
use crate::symtab::SymbolTable;
use crate::types::AsmErrorKind;

pub(crate) fn evaluate(
    expr: &Expr,
    symbols: &SymbolTable,
    location: i64,
) -> Result<i64, AsmErrorKind> {
    let mut total = 0i64;
    for (coefficient, atom) in &expr.terms {
        let value = match atom {
            Atom::Number(n) => *n,
            Atom::Here => location,
            Atom::Symbol(name) => symbols
                .lookup(name)
                .ok_or_else(|| AsmErrorKind::UndefinedSymbol(name.clone()))?,
        };
        total += coefficient * value;
    }
    Ok(total)
}
