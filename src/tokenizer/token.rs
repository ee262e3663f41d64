/// A classified lexeme produced by the lexer.
///
/// Literal variants carry their decoded value; symbol variants are bare
/// kinds. Tokens are immutable and a token sequence is always terminated
/// by [`Token::Eof`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Literal text outside every `${...}` span, passed through verbatim
    String(String),
    /// Integer literal inside a span
    Integer(i64),
    /// Float literal inside a span
    Float(f64),
    /// Quoted string inside a span, escape sequences decoded
    Quote(String),
    /// Variable or member name
    Identifier(String),

    // Symbols
    Plus,
    Minus,
    Multiply,
    Divide,
    LParen,
    RParen,
    Period,
    Comma,
    LBracket,
    RBracket,

    // End of input
    Eof,
}
