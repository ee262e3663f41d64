//! # Errors
//!
//! Crate-level error type. Each pipeline stage keeps its own error
//! enum; this wrapper carries whichever stage failed so callers can
//! match on the stage or just display the message.

use thiserror::Error;

use crate::eval::evaluator::EvalError;
use crate::parser::ParseError;
use crate::tokenizer::lexer::LexError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),
}

pub type ExpressionResult<T> = Result<T, ExpressionError>;
