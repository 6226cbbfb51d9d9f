//! JSON text to [`Value`].

use crate::{Result, Value};

/// Parse a complete JSON document.
///
/// Exactly one top-level value is accepted; trailing non-whitespace input
/// is an error. Nesting deeper than `serde_json`'s recursion limit fails
/// with a parse error instead of overflowing the stack.
///
/// # Example
///
/// ```rust
/// use json_schema_value::parse;
///
/// assert!(parse("[1, 2, 3]").is_ok());
/// assert!(parse("[1, 2,]").is_err());
/// ```
pub fn parse(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Parse a complete JSON document from raw bytes.
pub fn parse_slice(bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}
