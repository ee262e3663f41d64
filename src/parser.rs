//! # Parser
//!
//! Recursive-descent parser over the token stream. Precedence is encoded
//! in the descent: additive operators at the top, multiplicative below,
//! factors at the bottom, with member/index chains hanging off identifier
//! factors. One input produces an ordered sequence of expressions, one
//! per remaining top-level expression before EOF, so literal runs and
//! span results interleave in input order.

use thiserror::Error;

use crate::ast::{Expression, Operator};
use crate::tokenizer::token::Token;

pub type ParseResult<T> = Result<T, ParseError>;

/// Parsing failures; positions are token indices into the stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected end of expression")]
    UnexpectedEof,
    #[error("expected {expected} at position {position}, found {found}")]
    Expected {
        expected: &'static str,
        found: String,
        position: usize,
    },
    #[error("invalid token at position {position}: {found}")]
    InvalidToken { found: String, position: usize },
}

/// Builds expressions from one token sequence.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses every expression remaining before EOF.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse(&mut self) -> ParseResult<Vec<Expression>> {
        let mut expressions = Vec::new();
        while !matches!(self.current(), Token::Eof) {
            expressions.push(self.parse_expression()?);
        }
        Ok(expressions)
    }

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_term()?;
        loop {
            let operator = match self.current() {
                Token::Plus => Operator::Add,
                Token::Minus => Operator::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expression::BinaryOperation {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_factor()?;
        loop {
            let operator = match self.current() {
                Token::Multiply => Operator::Multiply,
                Token::Divide => Operator::Divide,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Expression::BinaryOperation {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> ParseResult<Expression> {
        match self.current().clone() {
            Token::Integer(value) => {
                self.advance();
                Ok(Expression::IntegerLiteral(value))
            }
            Token::Float(value) => {
                self.advance();
                Ok(Expression::FloatLiteral(value))
            }
            Token::Quote(text) | Token::String(text) => {
                self.advance();
                Ok(Expression::StringLiteral(text))
            }
            Token::Identifier(name) => {
                self.advance();
                self.parse_chain(Expression::Variable(name))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::Eof => Err(ParseError::UnexpectedEof),
            other => Err(ParseError::InvalidToken {
                found: format!("{:?}", other),
                position: self.position,
            }),
        }
    }

    /// Applies `.member`, `.member(args)` and `[key]` chains to an
    /// identifier base.
    ///
    /// A bracketed key that parsed as an integer literal selects index
    /// access; every other key expression selects keyed access and is
    /// type-checked at evaluation time.
    fn parse_chain(&mut self, base: Expression) -> ParseResult<Expression> {
        let mut expr = base;
        loop {
            match self.current() {
                Token::Period => {
                    self.advance();
                    let name = match self.current().clone() {
                        Token::Identifier(name) => {
                            self.advance();
                            name
                        }
                        other => {
                            return Err(ParseError::Expected {
                                expected: "an identifier after '.'",
                                found: format!("{:?}", other),
                                position: self.position,
                            })
                        }
                    };
                    if matches!(self.current(), Token::LParen) {
                        self.advance();
                        let arguments = self.parse_arguments()?;
                        expr = Expression::FunctionCall {
                            target: Box::new(expr),
                            name,
                            arguments,
                        };
                    } else {
                        expr = Expression::ObjectKeyAccess {
                            base: Box::new(expr),
                            key: Box::new(Expression::StringLiteral(name)),
                        };
                    }
                }
                Token::LBracket => {
                    self.advance();
                    let key = self.parse_expression()?;
                    self.expect(&Token::RBracket, "']'")?;
                    expr = if matches!(key, Expression::IntegerLiteral(_)) {
                        Expression::ArrayAccess {
                            base: Box::new(expr),
                            index: Box::new(key),
                        }
                    } else {
                        Expression::ObjectKeyAccess {
                            base: Box::new(expr),
                            key: Box::new(key),
                        }
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Parses a comma-separated argument list; the opening `(` has
    /// already been consumed.
    fn parse_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        let mut arguments = Vec::new();
        if !matches!(self.current(), Token::RParen) {
            loop {
                arguments.push(self.parse_expression()?);
                if matches!(self.current(), Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&Token::RParen, "')'")?;
        Ok(arguments)
    }

    fn expect(&mut self, expected: &Token, description: &'static str) -> ParseResult<()> {
        if self.current() == expected {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::Expected {
                expected: description,
                found: format!("{:?}", self.current()),
                position: self.position,
            })
        }
    }

    fn current(&self) -> &Token {
        static EOF: Token = Token::Eof;
        self.tokens.get(self.position).unwrap_or(&EOF)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}
