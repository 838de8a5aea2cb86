//! The MIXAL line grammar.
//!
//! Each source line was already split into label/operation/rest by the
//! lexer; here the operand text is carved off the rest of the line
//! (everything from the first whitespace after the operand is a
//! comment), tokenized, and parsed with nom combinators over the token
//! stream into a [`Statement`].

use nom::branch::alt;
use nom::combinator::{map, opt};
use nom::sequence::{delimited, pair, preceded, separated_pair};
use nom::IResult;

use base::prelude::opcode_for_mnemonic;

use crate::ast::{
    AddressArg, Atom, Expr, FieldArg, InstructionNode, PseudoNode, PseudoOp, PseudoOperand,
    Statement,
};
use crate::lexer::{split_source, tokenize, SourceLine, Token};
use crate::types::{AsmError, AsmErrorKind};

type TokenInput<'a> = &'a [Token];
type TokenResult<'a, T> = IResult<TokenInput<'a>, T>;

fn bail<T>(input: TokenInput<'_>) -> TokenResult<'_, T> {
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Tag,
    )))
}

fn token<'a>(expected: Token) -> impl Fn(TokenInput<'a>) -> TokenResult<'a, ()> {
    move |input| match input.split_first() {
        Some((tok, rest)) if *tok == expected => Ok((rest, ())),
        _ => bail(input),
    }
}

fn atom(input: TokenInput<'_>) -> TokenResult<'_, Atom> {
    match input.split_first() {
        Some((Token::Number(n), rest)) => Ok((rest, Atom::Number(*n))),
        Some((Token::Symbol(name), rest)) => Ok((rest, Atom::Symbol(name.clone()))),
        Some((Token::Asterisk, rest)) => Ok((rest, Atom::Here)),
        _ => bail(input),
    }
}

fn term_sign(input: TokenInput<'_>) -> TokenResult<'_, i64> {
    match input.split_first() {
        Some((Token::Plus, rest)) => Ok((rest, 1)),
        Some((Token::Minus, rest)) => Ok((rest, -1)),
        _ => bail(input),
    }
}

/// An optionally-signed term, followed by at most one more signed
/// term.  Left-to-right, no precedence.
fn expression(input: TokenInput<'_>) -> TokenResult<'_, Expr> {
    let (input, leading) = opt(term_sign)(input)?;
    let (input, first) = atom(input)?;
    let (input, second) = opt(pair(term_sign, atom))(input)?;
    let mut terms = vec![(leading.unwrap_or(1), first)];
    if let Some((sign, atom)) = second {
        terms.push((sign, atom));
    }
    Ok((input, Expr { terms }))
}

fn literal(input: TokenInput<'_>) -> TokenResult<'_, Expr> {
    delimited(token(Token::Equals), expression, token(Token::Equals))(input)
}

fn address_arg(input: TokenInput<'_>) -> TokenResult<'_, AddressArg> {
    alt((
        map(literal, AddressArg::Literal),
        map(expression, AddressArg::Expr),
    ))(input)
}

fn field_arg(input: TokenInput<'_>) -> TokenResult<'_, FieldArg> {
    delimited(
        token(Token::LParen),
        alt((
            map(
                separated_pair(expression, token(Token::Colon), expression),
                |(left, right)| FieldArg::Pair(left, right),
            ),
            map(expression, FieldArg::Single),
        )),
        token(Token::RParen),
    )(input)
}

/// The full operand of an instruction line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Operand {
    pub address: Option<AddressArg>,
    pub index: Option<Expr>,
    pub field: Option<FieldArg>,
}

fn operand(input: TokenInput<'_>) -> TokenResult<'_, Operand> {
    let (input, address) = opt(address_arg)(input)?;
    let (input, index) = opt(preceded(token(Token::Comma), expression))(input)?;
    let (input, field) = opt(field_arg)(input)?;
    Ok((
        input,
        Operand {
            address,
            index,
            field,
        },
    ))
}

fn parse_operand_tokens(tokens: &[Token]) -> Result<Operand, AsmErrorKind> {
    let parse_failure = || {
        if tokens.first() == Some(&Token::Equals) {
            AsmErrorKind::Literal("malformed literal operand".to_string())
        } else {
            AsmErrorKind::Parse("malformed operand".to_string())
        }
    };
    match operand(tokens) {
        Ok(([], parsed)) => Ok(parsed),
        Ok((_trailing, _)) => Err(parse_failure()),
        Err(_) => Err(parse_failure()),
    }
}

fn parse_expr_tokens(tokens: &[Token]) -> Result<Expr, AsmErrorKind> {
    match expression(tokens) {
        Ok(([], expr)) => Ok(expr),
        _ => Err(AsmErrorKind::Expression(
            "expected an expression of at most two terms".to_string(),
        )),
    }
}

/// The operand text: what's left after stripping leading blanks, up
/// to the next blank.  Anything beyond is trailing comment.
///
/// A chunk like `*WAIT` is a comment, not an operand: `*` followed
/// directly by an alphanumeric can never start an expression, whereas
/// `*`, `*-1` and `*+2` remain location-counter arithmetic.
fn operand_chunk(rest: &str) -> &str {
    let trimmed = rest.trim_start_matches([' ', '\t']);
    let chunk = match trimmed.find([' ', '\t']) {
        Some(pos) => &trimmed[..pos],
        None => trimmed,
    };
    if chunk.starts_with('*') && chunk[1..].starts_with(|c: char| c.is_ascii_alphanumeric()) {
        ""
    } else {
        chunk
    }
}

fn parse_pseudo(line: &SourceLine<'_>, op: PseudoOp) -> Result<Statement, AsmError> {
    let fail = |kind| AsmError::new(line.number, kind);
    if op == PseudoOp::Equ && line.label.is_none() {
        return Err(fail(AsmErrorKind::MissingLabel(op.name().to_string())));
    }
    let operand = match op {
        PseudoOp::Alf => {
            let text: String = line
                .rest
                .trim_start_matches([' ', '\t'])
                .chars()
                .take(5)
                .collect();
            if text.is_empty() {
                return Err(fail(AsmErrorKind::Parse(
                    "ALF requires a character operand".to_string(),
                )));
            }
            PseudoOperand::Text(text)
        }
        PseudoOp::End => {
            let chunk = operand_chunk(line.rest);
            if chunk.is_empty() {
                PseudoOperand::None
            } else {
                let tokens = tokenize(chunk).map_err(fail)?;
                PseudoOperand::Expr(parse_expr_tokens(&tokens).map_err(fail)?)
            }
        }
        PseudoOp::Orig | PseudoOp::Equ | PseudoOp::Con => {
            let chunk = operand_chunk(line.rest);
            if chunk.is_empty() {
                return Err(fail(AsmErrorKind::Parse(format!(
                    "{} requires an operand",
                    op.name()
                ))));
            }
            let tokens = tokenize(chunk).map_err(fail)?;
            PseudoOperand::Expr(parse_expr_tokens(&tokens).map_err(fail)?)
        }
    };
    Ok(Statement::Pseudo(PseudoNode {
        label: line.label.clone(),
        op,
        operand,
        line: line.number,
    }))
}

fn parse_instruction(line: &SourceLine<'_>) -> Result<Statement, AsmError> {
    let fail = |kind| AsmError::new(line.number, kind);
    let spec = opcode_for_mnemonic(&line.op)
        .ok_or_else(|| fail(AsmErrorKind::UnknownMnemonic(line.op.clone())))?;
    let chunk = operand_chunk(line.rest);
    let parsed = if chunk.is_empty() {
        Operand::default()
    } else {
        let tokens = tokenize(chunk).map_err(fail)?;
        parse_operand_tokens(&tokens).map_err(fail)?
    };
    Ok(Statement::Instruction(InstructionNode {
        label: line.label.clone(),
        mnemonic: line.op.clone(),
        spec,
        address: parsed.address,
        index: parsed.index,
        field: parsed.field,
        line: line.number,
    }))
}

pub(crate) fn parse_statement(line: &SourceLine<'_>) -> Result<Statement, AsmError> {
    match PseudoOp::from_name(&line.op) {
        Some(op) => parse_pseudo(line, op),
        None => parse_instruction(line),
    }
}

/// Parse a whole source text into statements, one per effective line.
pub(crate) fn parse_program(source: &str) -> Result<Vec<Statement>, AsmError> {
    split_source(source)?
        .iter()
        .map(parse_statement)
        .collect()
}
