//! Instruction decoding.
//!
//! The opcode byte selects an operation family and the field byte
//! selects the variant within it (or names an `(L:R)` partial word for
//! the memory-accessing families).  [`decode`] inspects both at once
//! and produces a single flat [`Operation`] value, so the executor can
//! be one flat match with no nested switches on the field.

use base::prelude::{FieldSpec, Instruction};

use crate::error::ExecError;

/// One of the addressable registers an operation family ranges over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegId {
    A,
    X,
    /// Index register 1..=6.
    I(u8),
}

impl RegId {
    /// Map a family offset (opcode minus the family base) to the
    /// register it addresses: 0 is rA, 1..=6 are rI1..rI6, 7 is rX.
    fn from_offset(offset: u8) -> RegId {
        match offset {
            0 => RegId::A,
            n @ 1..=6 => RegId::I(n),
            7 => RegId::X,
            _ => unreachable!("family offset {offset} out of range"),
        }
    }
}

/// What a store instruction stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreSource {
    Register(RegId),
    /// STJ; note its default field is (0:2), recorded in the mnemonic
    /// table, not here.
    Jump,
    /// STZ.
    Zero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    /// Shift rA left, zero fill.
    Sla,
    /// Shift rA right, zero fill.
    Sra,
    /// Shift rA and rX left as one ten-byte unit, zero fill.
    Slax,
    /// Shift rA and rX right as one ten-byte unit, zero fill.
    Srax,
    /// Circular left shift of the ten-byte unit.
    Slc,
    /// Circular right shift of the ten-byte unit.
    Src,
}

/// Conditions for the opcode-39 jump family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpCondition {
    Always,
    /// JSJ: jump without touching rJ.
    WithoutJ,
    OnOverflow,
    OnNoOverflow,
    Less,
    Equal,
    Greater,
    GreaterOrEqual,
    Unequal,
    LessOrEqual,
}

/// Sign predicates for the register-sign jump families (opcodes
/// 40..=47).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignCondition {
    Negative,
    Zero,
    Positive,
    NonNegative,
    NonZero,
    NonPositive,
}

/// The four address-transfer variants (opcodes 48..=55).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Enter,
    EnterNegative,
    Increase,
    Decrease,
}

/// A fully decoded operation.  Families carry their register, field
/// and condition payloads so that roughly 150 opcode/field
/// combinations collapse into one executable tag each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Nop,
    Add(FieldSpec),
    Sub(FieldSpec),
    Mul(FieldSpec),
    Div(FieldSpec),
    Num,
    Char,
    Halt,
    Shift(ShiftKind),
    Move { count: u8 },
    Load { target: RegId, field: FieldSpec, negate: bool },
    Store { source: StoreSource, field: FieldSpec },
    JumpBusy { unit: u8 },
    IoControl { unit: u8 },
    Input { unit: u8 },
    Output { unit: u8 },
    JumpReady { unit: u8 },
    Jump(JumpCondition),
    JumpSign { reg: RegId, condition: SignCondition },
    Transfer { reg: RegId, kind: TransferKind },
    Compare { reg: RegId, field: FieldSpec },
}

fn field_spec(inst: &Instruction) -> Result<FieldSpec, ExecError> {
    FieldSpec::from_code(inst.field).map_err(|_| ExecError::UnknownOpcode {
        opcode: inst.opcode,
        field: inst.field,
    })
}

fn sign_condition(inst: &Instruction) -> Result<SignCondition, ExecError> {
    match inst.field {
        0 => Ok(SignCondition::Negative),
        1 => Ok(SignCondition::Zero),
        2 => Ok(SignCondition::Positive),
        3 => Ok(SignCondition::NonNegative),
        4 => Ok(SignCondition::NonZero),
        5 => Ok(SignCondition::NonPositive),
        _ => Err(ExecError::UnknownOpcode {
            opcode: inst.opcode,
            field: inst.field,
        }),
    }
}

/// Decode an instruction word's fields into an [`Operation`].
///
/// Fails with [`ExecError::InvalidIndex`] when byte 3 names a
/// nonexistent index register and with [`ExecError::UnknownOpcode`]
/// when the opcode/field combination is undefined.
pub fn decode(inst: &Instruction) -> Result<Operation, ExecError> {
    if inst.index > 6 {
        return Err(ExecError::InvalidIndex(inst.index));
    }
    let unknown = Err(ExecError::UnknownOpcode {
        opcode: inst.opcode,
        field: inst.field,
    });
    match inst.opcode {
        0 => Ok(Operation::Nop),
        1 => Ok(Operation::Add(field_spec(inst)?)),
        2 => Ok(Operation::Sub(field_spec(inst)?)),
        3 => Ok(Operation::Mul(field_spec(inst)?)),
        4 => Ok(Operation::Div(field_spec(inst)?)),
        5 => match inst.field {
            0 => Ok(Operation::Num),
            1 => Ok(Operation::Char),
            2 => Ok(Operation::Halt),
            _ => unknown,
        },
        6 => match inst.field {
            0 => Ok(Operation::Shift(ShiftKind::Sla)),
            1 => Ok(Operation::Shift(ShiftKind::Sra)),
            2 => Ok(Operation::Shift(ShiftKind::Slax)),
            3 => Ok(Operation::Shift(ShiftKind::Srax)),
            4 => Ok(Operation::Shift(ShiftKind::Slc)),
            5 => Ok(Operation::Shift(ShiftKind::Src)),
            _ => unknown,
        },
        7 => Ok(Operation::Move { count: inst.field }),
        c @ 8..=23 => Ok(Operation::Load {
            target: RegId::from_offset((c - 8) % 8),
            field: field_spec(inst)?,
            negate: c >= 16,
        }),
        c @ 24..=31 => Ok(Operation::Store {
            source: StoreSource::Register(RegId::from_offset(c - 24)),
            field: field_spec(inst)?,
        }),
        32 => Ok(Operation::Store {
            source: StoreSource::Jump,
            field: field_spec(inst)?,
        }),
        33 => Ok(Operation::Store {
            source: StoreSource::Zero,
            field: field_spec(inst)?,
        }),
        34 => Ok(Operation::JumpBusy { unit: inst.field }),
        35 => Ok(Operation::IoControl { unit: inst.field }),
        36 => Ok(Operation::Input { unit: inst.field }),
        37 => Ok(Operation::Output { unit: inst.field }),
        38 => Ok(Operation::JumpReady { unit: inst.field }),
        39 => match inst.field {
            0 => Ok(Operation::Jump(JumpCondition::Always)),
            1 => Ok(Operation::Jump(JumpCondition::WithoutJ)),
            2 => Ok(Operation::Jump(JumpCondition::OnOverflow)),
            3 => Ok(Operation::Jump(JumpCondition::OnNoOverflow)),
            4 => Ok(Operation::Jump(JumpCondition::Less)),
            5 => Ok(Operation::Jump(JumpCondition::Equal)),
            6 => Ok(Operation::Jump(JumpCondition::Greater)),
            7 => Ok(Operation::Jump(JumpCondition::GreaterOrEqual)),
            8 => Ok(Operation::Jump(JumpCondition::Unequal)),
            9 => Ok(Operation::Jump(JumpCondition::LessOrEqual)),
            _ => unknown,
        },
        c @ 40..=47 => Ok(Operation::JumpSign {
            reg: RegId::from_offset(c - 40),
            condition: sign_condition(inst)?,
        }),
        c @ 48..=55 => {
            let kind = match inst.field {
                0 => TransferKind::Enter,
                1 => TransferKind::EnterNegative,
                2 => TransferKind::Increase,
                3 => TransferKind::Decrease,
                _ => return unknown,
            };
            Ok(Operation::Transfer {
                reg: RegId::from_offset(c - 48),
                kind,
            })
        }
        c @ 56..=63 => Ok(Operation::Compare {
            reg: RegId::from_offset(c - 56),
            field: field_spec(inst)?,
        }),
        _ => unknown,
    }
}
