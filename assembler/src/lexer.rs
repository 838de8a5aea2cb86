//! Lexical analysis of MIXAL source.
//!
//! The language is line-oriented.  This module splits the source into
//! labelled lines (dropping blank lines and `*` comment lines) and
//! tokenizes the address field of each line with a Logos-generated
//! lexer.  Deciding whether the first word of a line is a label or an
//! operation is a keyword-table lookup: operations and pseudo-ops are
//! never labels.

use logos::Logos;

use base::prelude::opcode_for_mnemonic;

use crate::ast::PseudoOp;
use crate::types::{AsmError, AsmErrorKind};

/// Tokens of the address field, `ADDRESS[,INDEX][(FIELD)]`.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
pub(crate) enum Token {
    #[regex("[A-Za-z][A-Za-z0-9]*", |lex| lex.slice().to_ascii_uppercase())]
    Symbol(String),

    // Unsigned here; signs are separate tokens.
    #[regex("[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Number(i64),

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Asterisk,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(":")]
    Colon,

    #[token("=")]
    Equals,
}

pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, AsmErrorKind> {
    let mut lexer = Token::lexer(text);
    let mut tokens = Vec::new();
    while let Some(item) = lexer.next() {
        match item {
            Ok(token) => tokens.push(token),
            Err(()) => {
                return Err(AsmErrorKind::Lex(format!("'{}'", lexer.slice())));
            }
        }
    }
    Ok(tokens)
}

/// A source line reduced to its three fields.  `rest` is the raw text
/// after the operation word; the parser decides how much of it is
/// operand and how much is trailing comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceLine<'a> {
    pub number: u32,
    pub label: Option<String>,
    pub op: String,
    pub rest: &'a str,
}

fn is_keyword(word: &str) -> bool {
    opcode_for_mnemonic(word).is_some() || PseudoOp::from_name(word).is_some()
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// The next whitespace-delimited word of `line` at or after byte
/// `from`, as a byte range.
fn next_word(line: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = line.as_bytes();
    let mut start = from;
    while start < bytes.len() && (bytes[start] == b' ' || bytes[start] == b'\t') {
        start += 1;
    }
    if start == bytes.len() {
        return None;
    }
    let mut end = start;
    while end < bytes.len() && bytes[end] != b' ' && bytes[end] != b'\t' {
        end += 1;
    }
    Some((start, end))
}

/// Split source text into lines ready for parsing.  Blank lines and
/// whole-line comments (`*` in column 1) are dropped here.
pub(crate) fn split_source(source: &str) -> Result<Vec<SourceLine<'_>>, AsmError> {
    let mut lines = Vec::new();
    for (index, text) in source.lines().enumerate() {
        let number = (index + 1) as u32;
        if text.trim().is_empty() || text.starts_with('*') {
            continue;
        }
        let (first_start, first_end) =
            next_word(text, 0).expect("a non-blank line has a first word");
        let first = &text[first_start..first_end];

        let (label, op, op_end) = if is_keyword(first) {
            (None, first.to_ascii_uppercase(), first_end)
        } else {
            if !is_identifier(first) {
                return Err(AsmError::new(
                    number,
                    AsmErrorKind::Parse(format!("expected a label or operation, found '{first}'")),
                ));
            }
            let (op_start, op_end) = next_word(text, first_end).ok_or_else(|| {
                AsmError::new(
                    number,
                    AsmErrorKind::Parse(format!("label '{first}' has no operation")),
                )
            })?;
            let op = &text[op_start..op_end];
            if !is_keyword(op) {
                return Err(AsmError::new(
                    number,
                    AsmErrorKind::UnknownMnemonic(op.to_string()),
                ));
            }
            (
                Some(first.to_ascii_uppercase()),
                op.to_ascii_uppercase(),
                op_end,
            )
        };
        lines.push(SourceLine {
            number,
            label,
            op,
            rest: &text[op_end..],
        });
    }
    Ok(lines)
}
