//! # Expression AST
//!
//! Compiled form of one `${...}` span. Nodes own their children outright,
//! so every compiled expression is a strict tree with no shared state,
//! which is what lets the engine cache and re-evaluate them freely.

use strum_macros::{AsRefStr, Display, EnumString};

/// Arithmetic operators usable inside an expression span.
///
/// Each operator is written as a one-character lexeme and applies to
/// operands widened to `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Operator {
    /// Addition (`+`)
    #[strum(serialize = "+")]
    Add,
    /// Subtraction (`-`)
    #[strum(serialize = "-")]
    Subtract,
    /// Multiplication (`*`)
    #[strum(serialize = "*")]
    Multiply,
    /// Division (`/`)
    #[strum(serialize = "/")]
    Divide,
}

impl Operator {
    /// Applies the operator to two widened operands.
    ///
    /// Division by zero is rejected before this is reached, so the result
    /// is always a finite combination of the inputs.
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
        }
    }
}

/// One node of a compiled expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Integer literal (`42`)
    IntegerLiteral(i64),
    /// Float literal (`3.14`)
    FloatLiteral(f64),
    /// String literal, either a quoted string inside a span or a literal
    /// text run outside every span
    StringLiteral(String),
    /// Variable reference resolved against the environment (`user`)
    Variable(String),
    /// Left-associative arithmetic (`a + b`)
    BinaryOperation {
        left: Box<Expression>,
        operator: Operator,
        right: Box<Expression>,
    },
    /// Keyed access on a map (`obj.name`, `obj[key]`)
    ObjectKeyAccess {
        base: Box<Expression>,
        key: Box<Expression>,
    },
    /// Index access on a list (`items[0]`)
    ArrayAccess {
        base: Box<Expression>,
        index: Box<Expression>,
    },
    /// Method call on a host object (`str.subString(s, 0, 5)`)
    FunctionCall {
        target: Box<Expression>,
        name: String,
        arguments: Vec<Expression>,
    },
}
