//! Locates `${...}` expression spans in raw input text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A span opener followed by its tentative closer. The lexer re-scans
    /// from each opener, so the pattern only decides where expressions
    /// begin, not where they end.
    static ref SPAN_PATTERN: Regex = Regex::new(r"\$\{[^}]*\}").unwrap();
}

/// Byte offsets of every `${` that opens a closed span, in input order.
///
/// An opener with no `}` before end of input is not a span and stays
/// literal text. Nesting is not supported; the tentative closer is the
/// first `}` after the opener.
pub fn span_starts(input: &str) -> Vec<usize> {
    SPAN_PATTERN.find_iter(input).map(|m| m.start()).collect()
}
