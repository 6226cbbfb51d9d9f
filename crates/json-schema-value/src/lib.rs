//! # json-schema-value
//!
//! The JSON value tree consumed by `json-schema-validation`.
//!
//! Parsing goes through `serde_json`, but the resulting tree is our own
//! [`Value`]. Numbers keep their integer/float representation so that a
//! validator can tell `1` from `1.0` while still comparing them as equal.
//! Objects keep their key order.
//!
//! ## Example
//!
//! ```rust
//! use json_schema_value::parse;
//!
//! let value = parse(r#"{"name": "widget", "tags": ["a", "b"]}"#).unwrap();
//! assert_eq!(value.pointer("/tags/1").and_then(|v| v.as_str()), Some("b"));
//! ```

mod error;
mod number;
mod parser;
mod pointer;
mod value;

pub use error::{ParseError, Result};
pub use number::Number;
pub use parser::{parse, parse_slice};
pub use pointer::{JsonPointer, PathSegment, escape, unescape};
pub use value::{Map, Value};
