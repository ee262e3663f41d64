//! # Lexer
//!
//! Turns raw template text into one token stream. Literal runs become
//! single [`Token::String`] tokens; span interiors are scanned
//! token-by-token until their closing `}`. Symbol and identifier
//! recognition run through nom combinators over the remaining input;
//! numbers and quoted strings are scanned by hand because their error
//! positions and escape handling depend on where scanning stands.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    combinator::{map, recognize, value},
    error::{context, VerboseError},
    sequence::pair,
    IResult,
};
use thiserror::Error;

use super::span::span_starts;
use super::token::Token;

pub type ParserResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

pub type LexResult<T> = Result<T, LexError>;

/// Lexing failures, each carrying the byte offset where scanning stopped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },
    #[error("unterminated quoted string starting at position {position}")]
    UnterminatedString { position: usize },
    #[error("invalid number format at position {position}")]
    MalformedNumber { position: usize },
}

/// Scans one input string into a token sequence terminated by
/// [`Token::Eof`].
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Tokenizes the whole input.
    ///
    /// An input without any span yields exactly one `String` token
    /// carrying the input verbatim (the empty string included). Span
    /// interiors that run past their tentative closer, e.g. a quoted
    /// string containing `}`, keep consuming tokens until a later `}` or
    /// end of input; a span start swallowed that way is not re-scanned.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn tokenize(&mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let starts = span_starts(self.input);

        if starts.is_empty() {
            tokens.push(Token::String(self.input.to_string()));
            tokens.push(Token::Eof);
            return Ok(tokens);
        }

        for start in starts {
            if start < self.position {
                continue;
            }
            if start > self.position {
                tokens.push(Token::String(self.input[self.position..start].to_string()));
            }
            // Step over the `${` opener.
            self.position = start + 2;
            self.scan_span(&mut tokens)?;
        }

        if self.position < self.input.len() {
            tokens.push(Token::String(self.input[self.position..].to_string()));
        }
        tokens.push(Token::Eof);

        Ok(tokens)
    }

    /// Scans span-interior tokens until an unconsumed `}` or end of input.
    fn scan_span(&mut self, tokens: &mut Vec<Token>) -> LexResult<()> {
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Ok(()),
                Some('}') => {
                    self.position += 1;
                    return Ok(());
                }
                Some(c) => {
                    let token = self.next_token(c)?;
                    tokens.push(token);
                }
            }
        }
    }

    fn next_token(&mut self, current: char) -> LexResult<Token> {
        if current == '"' || current == '\'' {
            return self.quoted_string(current);
        }
        if current.is_ascii_digit() {
            return self.number();
        }

        let remaining = &self.input[self.position..];
        match alt((symbol, identifier))(remaining) {
            Ok((rest, token)) => {
                self.position += remaining.len() - rest.len();
                Ok(token)
            }
            Err(_) => Err(LexError::InvalidCharacter {
                character: current,
                position: self.position,
            }),
        }
    }

    /// Scans a quoted string, decoding `\"`, `\'`, `\n`, `\r` and `\t`.
    ///
    /// A backslash always consumes the following character, so an escaped
    /// quote never closes the string; unlisted escapes pass through with
    /// their backslash intact.
    fn quoted_string(&mut self, quote: char) -> LexResult<Token> {
        let start = self.position;
        let mut decoded = String::new();
        let mut chars = self.input[start + 1..].char_indices();

        while let Some((offset, c)) = chars.next() {
            if c == quote {
                self.position = start + 1 + offset + 1;
                return Ok(Token::Quote(decoded));
            }
            if c == '\\' {
                match chars.next() {
                    Some((_, escaped)) => match escaped {
                        '"' | '\'' => decoded.push(escaped),
                        'n' => decoded.push('\n'),
                        'r' => decoded.push('\r'),
                        't' => decoded.push('\t'),
                        other => {
                            decoded.push('\\');
                            decoded.push(other);
                        }
                    },
                    None => break,
                }
            } else {
                decoded.push(c);
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    /// Scans the maximal run of digits and dots as one numeric literal.
    fn number(&mut self) -> LexResult<Token> {
        let start = self.position;
        let rest = &self.input[start..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        let literal = &rest[..end];

        if literal.matches('.').count() > 1 {
            return Err(LexError::MalformedNumber { position: start });
        }

        self.position = start + end;
        if literal.contains('.') {
            let parsed = literal
                .parse::<f64>()
                .map_err(|_| LexError::MalformedNumber { position: start })?;
            Ok(Token::Float(parsed))
        } else {
            let parsed = literal
                .parse::<i64>()
                .map_err(|_| LexError::MalformedNumber { position: start })?;
            Ok(Token::Integer(parsed))
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.position..];
        let trimmed = rest.trim_start();
        self.position += rest.len() - trimmed.len();
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }
}

#[tracing::instrument(level = "debug", skip(input))]
fn symbol(input: &str) -> ParserResult<Token> {
    context(
        "symbol",
        alt((
            value(Token::Plus, tag("+")),
            value(Token::Minus, tag("-")),
            value(Token::Multiply, tag("*")),
            value(Token::Divide, tag("/")),
            value(Token::LParen, tag("(")),
            value(Token::RParen, tag(")")),
            value(Token::Period, tag(".")),
            value(Token::Comma, tag(",")),
            value(Token::LBracket, tag("[")),
            value(Token::RBracket, tag("]")),
        )),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn identifier(input: &str) -> ParserResult<Token> {
    context(
        "identifier",
        map(
            recognize(pair(
                take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
                take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
            )),
            |id: &str| Token::Identifier(id.to_string()),
        ),
    )(input)
}
