//! Error types for color table parsing.

use thiserror::Error;

/// Result type for color table operations.
pub type ColorTableResult<T> = Result<T, ColorTableError>;

/// Error types for color table parsing.
///
/// Line numbers are 1-based.
#[derive(Error, Debug)]
pub enum ColorTableError {
    /// Reading the underlying stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line} is longer than {max} bytes")]
    LineTooLong { line: usize, max: usize },

    #[error("line {line}: unknown statement type '{keyword}'")]
    UnknownStatementType { line: usize, keyword: String },

    /// Non-comment line without a `keyword:` prefix
    #[error("line {line}: malformed statement")]
    MalformedStatement { line: usize },

    #[error("line {line}: invalid numeric token '{token}'")]
    InvalidNumericToken { line: usize, token: String },

    #[error("line {line}: missing token")]
    MissingToken { line: usize },
}
