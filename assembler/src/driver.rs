//! The two-pass assembly driver.
//!
//! Pass 1 walks the statements in order, maintaining the location
//! counter, defining symbols, collecting the emission list and
//! interning literal operands.  Literals get their slots after the
//! walk, in first-occurrence order, at the end of the location
//! sequence.  Pass 2 evaluates everything (forward references are now
//! resolved) and writes words into a full 4000-word image.

use tracing::{event, Level};

use base::charset;
use base::prelude::{Instruction, Sign, Word, MAX_ADDRESS, MEMORY_SIZE};

use crate::ast::{AddressArg, Expr, FieldArg, InstructionNode, PseudoOp, PseudoOperand, Statement};
use crate::eval::evaluate;
use crate::parser::parse_program;
use crate::symtab::SymbolTable;
use crate::types::{AsmError, AsmErrorKind};

/// The result of a successful assembly, ready to hand to a machine.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// The complete memory image, one word per address.
    pub image: Vec<Word>,
    /// The program's start address, from END.
    pub entry: u16,
    pub symbols: SymbolTable,
}

enum EmitItem {
    /// Index into the statement list.
    Statement(usize),
    /// Index into the literal pool.
    Literal(usize),
}

struct EmitEntry {
    location: i64,
    line: u32,
    item: EmitItem,
}

struct PoolEntry {
    /// Canonical expression text; the interning key.
    key: String,
    expr: Expr,
    /// Line of the first occurrence, for diagnostics.
    line: u32,
    address: i64,
}

/// Assemble MIXAL source into a memory image.
pub fn assemble(source: &str) -> Result<Assembly, AsmError> {
    let statements = parse_program(source)?;

    // Pass 1: symbols, locations, literal interning.
    let mut symbols = SymbolTable::new();
    let mut emissions: Vec<EmitEntry> = Vec::new();
    let mut pool: Vec<PoolEntry> = Vec::new();
    let mut location: i64 = 0;
    let mut end_operand: Option<(Expr, u32)> = None;

    'walk: for (index, statement) in statements.iter().enumerate() {
        let line = statement.line();
        let fail = |kind| AsmError::new(line, kind);
        let mut emit_here = |location: i64| {
            emissions.push(EmitEntry {
                location,
                line,
                item: EmitItem::Statement(index),
            });
        };
        match statement {
            Statement::Pseudo(node) => match node.op {
                PseudoOp::Orig => {
                    // A label on ORIG names the location *before* the
                    // counter moves.
                    if let Some(label) = &node.label {
                        symbols.define(label, location).map_err(fail)?;
                    }
                    let expr = pseudo_expr(&node.operand);
                    location = evaluate(expr, &symbols, location).map_err(fail)?;
                    event!(Level::DEBUG, "ORIG moves the location counter to {location}");
                }
                PseudoOp::Equ => {
                    let label = node.label.as_deref().expect("the parser enforces EQU labels");
                    let expr = pseudo_expr(&node.operand);
                    let value = evaluate(expr, &symbols, location).map_err(fail)?;
                    symbols.define(label, value).map_err(fail)?;
                }
                PseudoOp::Con | PseudoOp::Alf => {
                    if let Some(label) = &node.label {
                        symbols.define(label, location).map_err(fail)?;
                    }
                    emit_here(location);
                    location += 1;
                }
                PseudoOp::End => {
                    if let PseudoOperand::Expr(expr) = &node.operand {
                        end_operand = Some((expr.clone(), line));
                    }
                    break 'walk;
                }
            },
            Statement::Instruction(node) => {
                if let Some(label) = &node.label {
                    symbols.define(label, location).map_err(fail)?;
                }
                if let Some(AddressArg::Literal(expr)) = &node.address {
                    let key = expr.to_string();
                    if !pool.iter().any(|slot| slot.key == key) {
                        pool.push(PoolEntry {
                            key,
                            expr: expr.clone(),
                            line,
                            address: 0,
                        });
                    }
                }
                emit_here(location);
                location += 1;
            }
        }
    }

    // Allocate the literal pool after everything else, in the order
    // the literals first appeared.
    for (index, slot) in pool.iter_mut().enumerate() {
        slot.address = location;
        event!(Level::DEBUG, "literal ={}= allocated at {location}", slot.key);
        emissions.push(EmitEntry {
            location,
            line: slot.line,
            item: EmitItem::Literal(index),
        });
        location += 1;
    }

    // Pass 2: emission.
    let mut image = vec![Word::ZERO; MEMORY_SIZE];
    for entry in &emissions {
        let fail = |kind| AsmError::new(entry.line, kind);
        if !(0..MEMORY_SIZE as i64).contains(&entry.location) {
            return Err(fail(AsmErrorKind::OriginRange(entry.location)));
        }
        let word = match &entry.item {
            EmitItem::Literal(index) => {
                let slot = &pool[*index];
                let value = evaluate(&slot.expr, &symbols, entry.location).map_err(fail)?;
                Word::from_i64(value).map_err(|e| fail(e.into()))?
            }
            EmitItem::Statement(index) => match &statements[*index] {
                Statement::Pseudo(node) if node.op == PseudoOp::Con => {
                    let value =
                        evaluate(pseudo_expr(&node.operand), &symbols, entry.location).map_err(fail)?;
                    Word::from_i64(value).map_err(|e| fail(e.into()))?
                }
                Statement::Pseudo(node) => {
                    let PseudoOperand::Text(text) = &node.operand else {
                        unreachable!("only ALF reaches here, and ALF carries text");
                    };
                    charset::alf_word(text).map_err(|e| fail(e.into()))?
                }
                Statement::Instruction(node) => {
                    encode_instruction(node, entry.location, &symbols, &pool)?
                }
            },
        };
        image[entry.location as usize] = word;
    }

    // The END operand, resolved against location 0, names the entry
    // point.
    let entry = match end_operand {
        Some((expr, line)) => {
            let value = evaluate(&expr, &symbols, 0).map_err(|kind| AsmError::new(line, kind))?;
            if !(0..MEMORY_SIZE as i64).contains(&value) {
                return Err(AsmError::new(line, AsmErrorKind::OriginRange(value)));
            }
            value as u16
        }
        None => 0,
    };
    event!(
        Level::INFO,
        "assembled {} words, {} literals, entry point {entry}",
        emissions.len(),
        pool.len()
    );

    Ok(Assembly {
        image,
        entry,
        symbols,
    })
}

fn pseudo_expr(operand: &PseudoOperand) -> &Expr {
    match operand {
        PseudoOperand::Expr(expr) => expr,
        _ => unreachable!("the parser supplies expressions for ORIG, EQU and CON"),
    }
}

fn encode_instruction(
    node: &InstructionNode,
    location: i64,
    symbols: &SymbolTable,
    pool: &[PoolEntry],
) -> Result<Word, AsmError> {
    let fail = |kind| AsmError::new(node.line, kind);

    let (sign, address) = match &node.address {
        None => (Sign::Plus, 0u16),
        Some(AddressArg::Literal(expr)) => {
            let key = expr.to_string();
            let slot = pool
                .iter()
                .find(|slot| slot.key == key)
                .expect("pass 1 interned every literal");
            (Sign::Plus, slot.address as u16)
        }
        Some(AddressArg::Expr(expr)) => {
            let value = evaluate(expr, symbols, location).map_err(fail)?;
            if value.abs() > MAX_ADDRESS {
                return Err(fail(AsmErrorKind::AddressRange(value)));
            }
            (Sign::of(value), value.unsigned_abs() as u16)
        }
    };

    let index = match &node.index {
        None => 0u8,
        Some(expr) => {
            let value = evaluate(expr, symbols, location).map_err(fail)?;
            if !(0..=6).contains(&value) {
                return Err(fail(AsmErrorKind::IndexRange(value)));
            }
            value as u8
        }
    };

    let field = match &node.field {
        None => node.spec.field,
        Some(FieldArg::Single(expr)) => {
            let value = evaluate(expr, symbols, location).map_err(fail)?;
            if !(0..64).contains(&value) {
                return Err(fail(AsmErrorKind::FieldRange(value)));
            }
            value as u8
        }
        Some(FieldArg::Pair(left, right)) => {
            let left = evaluate(left, symbols, location).map_err(fail)?;
            let right = evaluate(right, symbols, location).map_err(fail)?;
            if !(0..64).contains(&left) {
                return Err(fail(AsmErrorKind::FieldRange(left)));
            }
            if !(0..64).contains(&right) {
                return Err(fail(AsmErrorKind::FieldRange(right)));
            }
            base::word::FieldSpec::new(left as u8, right as u8)
                .map_err(|e| fail(e.into()))?
                .code()
        }
    };

    Ok(Instruction {
        sign,
        address,
        index,
        field,
        opcode: node.spec.opcode,
    }
    .to_word())
}
