//! # tsumugi
//!
//! Embedded-expression evaluation for plain text. Input is scanned for
//! `${...}` spans; each expression is compiled once, evaluated against
//! caller-supplied variables and spliced back into the surrounding
//! text, which passes through verbatim.
//!
//! ## Pipeline
//!
//! - [`tokenizer`]: finds spans and turns the whole input into one
//!   token stream, literal runs included
//! - [`parser`]: recursive descent over the tokens, one expression per
//!   segment
//! - [`eval`]: tree-walking evaluation against an [`Environment`]
//! - [`engine`]: the caching front door gluing the stages together
//!
//! ## Example
//!
//! ```
//! use tsumugi::{Environment, ExpressionEngine, Value};
//!
//! let engine = ExpressionEngine::new();
//! let mut env = Environment::new();
//! env.set_variable("name", Value::String("world".to_string()));
//!
//! let output = engine.execute("hello ${name}, ${1 + 1}!", &env)?;
//! assert_eq!(output, "hello world, 2.0!");
//! # Ok::<(), tsumugi::ExpressionError>(())
//! ```

pub mod ast;
pub mod engine;
pub mod error;
pub mod eval;
pub mod parser;
pub mod tokenizer;

// Re-exports
pub use ast::{Expression, Operator};
pub use engine::ExpressionEngine;
pub use error::{ExpressionError, ExpressionResult};
pub use eval::environment::Environment;
pub use eval::evaluator::{evaluate, EvalError, EvalResult};
pub use eval::host::{HostFn, HostMethod, HostObject, MethodRegistry, ParamType};
pub use eval::value::Value;
pub use parser::{ParseError, ParseResult, Parser};
pub use tokenizer::lexer::{LexError, LexResult, Lexer};
pub use tokenizer::token::Token;
