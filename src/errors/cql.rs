//! CQL parsing error types

use thiserror::Error;

/// Errors raised while tokenizing or parsing a CQL predicate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CqlError {
    /// A character that cannot start any token
    #[error("Unexpected character '{found}' at offset {offset}")]
    UnexpectedChar {
        /// Offending character
        found: char,
        /// Byte offset in the input
        offset: usize,
    },

    /// A quoted string or identifier was never closed
    #[error("Unterminated {kind} starting at offset {offset}")]
    Unterminated {
        /// "string" or "identifier"
        kind: &'static str,
        /// Byte offset of the opening quote
        offset: usize,
    },

    /// A token that does not fit the grammar at this position
    #[error("Unexpected token '{found}' at offset {offset}, expected {expected}")]
    UnexpectedToken {
        /// Textual form of the token
        found: String,
        /// What the parser was looking for
        expected: &'static str,
        /// Byte offset in the input
        offset: usize,
    },

    /// Input ended in the middle of an expression
    #[error("Unexpected end of CQL expression")]
    UnexpectedEnd,

    /// Input was empty or whitespace only
    #[error("Empty CQL expression")]
    Empty,

    /// Valid CQL whose shape cannot be projected onto filter rows
    #[error("Expression cannot be edited as filter rows: {0}")]
    Unsupported(String),
}
