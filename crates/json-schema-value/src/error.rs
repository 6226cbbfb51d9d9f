//! Error type for JSON parsing.

use thiserror::Error;

/// Result type alias for json-schema-value operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Malformed JSON input.
///
/// `line` and `column` are 1-based and point at the character where the
/// parser gave up. Both are 0 when the error is not tied to a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}
