//! Tokenizer - PEST-based splitter for QUT program text
//!
//! Splits source text into whitespace-separated tokens and maps each token to
//! its opcode. Order is preserved: the n-th token becomes the n-th opcode.

use pest::Parser;
use pest_derive::Parser;

use super::errors::{QutError, QutResult};
use super::opcode::Opcode;
use super::trace::Observer;

/* ===================== PEST Parser ===================== */

#[derive(Parser)]
#[grammar = "interpreter/qut.pest"]
struct QutParser;

impl From<pest::error::Error<Rule>> for QutError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        QutError::Syntax(err.to_string())
    }
}

/* ===================== Tokens ===================== */

/// One raw token with its location in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Index in the token list (the instruction position)
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

/* ===================== Public API ===================== */

/// Split program text into tokens
pub fn tokenize(source: &str) -> QutResult<Vec<Token<'_>>> {
    let mut pairs = QutParser::parse(Rule::program, source)?;

    // program = { SOI ~ token* ~ EOI }
    let Some(program) = pairs.next() else {
        return Ok(Vec::new());
    };

    let tokens = program
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::token)
        .enumerate()
        .map(|(index, pair)| {
            let (line, column) = pair.as_span().start_pos().line_col();
            Token {
                text: pair.as_str(),
                index,
                line,
                column,
            }
        })
        .collect();

    Ok(tokens)
}

/// Map a single token to its opcode
pub fn opcode_for(token: &Token<'_>) -> QutResult<Opcode> {
    Opcode::from_mnemonic(token.text).ok_or_else(|| QutError::UnknownInstruction {
        token: token.text.to_string(),
        position: token.index,
        line: token.line,
        column: token.column,
    })
}

/// Tokenize program text and map every token to an opcode
///
/// Stops at the first unknown mnemonic.
pub fn to_opcodes(source: &str, observer: &mut dyn Observer) -> QutResult<Vec<Opcode>> {
    let tokens = tokenize(source)?;
    let mut opcodes = Vec::with_capacity(tokens.len());

    for token in &tokens {
        let opcode = opcode_for(token)?;
        observer.on_token(token.index, token.text, opcode);
        opcodes.push(opcode);
    }

    Ok(opcodes)
}
