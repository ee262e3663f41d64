//! # Tokenizer Component
//!
//! Lexical analysis of template text: raw input goes in, one structured
//! token stream comes out, ready for the parser.
//!
//! Input is not a program but a text with embedded `${...}` expression
//! spans, so tokenization happens in two layers:
//!
//! * [`span`]: finds where expression spans begin; everything outside
//!   them is opaque literal text.
//! * [`lexer`]: emits each literal run as a single [`Token::String`]
//!   and scans span interiors token-by-token (numbers, quoted strings,
//!   identifiers, symbols), appending [`Token::Eof`] at the end.
//!
//! The stream is shared across spans: `"${a}${b}"` produces the tokens of
//! both spans back to back, and the parser rebuilds one expression per
//! span from that single sequence.
//!
//! Errors surface as [`lexer::LexError`] values carrying the byte offset
//! where scanning stopped.
//!
//! [`Token::String`]: token::Token::String
//! [`Token::Eof`]: token::Token::Eof

pub mod lexer;
pub mod span;
pub mod token;
