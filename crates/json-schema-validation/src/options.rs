//! Validator construction options.

use crate::draft::Draft;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Options fixed at validator construction.
///
/// Deserializes from any serde format with every field optional, so a
/// TOML file containing only `draft = "draft4"` is a complete config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorOptions {
    /// Draft used for the root schema
    pub draft: Draft,
    /// Make the embedded meta-schemas resolvable by `$ref`
    pub with_meta_schemas: bool,
    /// Treat `format` (and draft 6/7 content keywords) as assertions
    pub validate_formats: bool,
}

/// A loosely-typed option value, as supplied by callers that build
/// options from name/value pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionValue<'a> {
    Str(&'a str),
    Bool(bool),
}

impl fmt::Display for OptionValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Str(s) => write!(f, "'{}'", s),
            OptionValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl<'a> From<&'a str> for OptionValue<'a> {
    fn from(s: &'a str) -> Self {
        OptionValue::Str(s)
    }
}

impl From<bool> for OptionValue<'_> {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl ValidatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.draft = draft;
        self
    }

    pub fn with_meta_schemas(mut self, enabled: bool) -> Self {
        self.with_meta_schemas = enabled;
        self
    }

    pub fn with_format_assertions(mut self, enabled: bool) -> Self {
        self.validate_formats = enabled;
        self
    }

    /// Build options from `(name, value)` pairs, starting from the
    /// defaults.
    ///
    /// # Errors
    ///
    /// `Error::InvalidOption` for an unknown draft token, an unknown
    /// option name or a value of the wrong kind.
    ///
    /// ```rust
    /// use json_schema_validation::{Draft, OptionValue, ValidatorOptions};
    ///
    /// let options = ValidatorOptions::from_pairs([
    ///     ("draft", OptionValue::from("draft4")),
    ///     ("with_meta_schemas", OptionValue::from(true)),
    /// ])
    /// .unwrap();
    /// assert_eq!(options.draft, Draft::Draft4);
    /// assert!(options.with_meta_schemas);
    /// ```
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (&'a str, OptionValue<'a>)>,
    {
        let mut options = Self::default();
        for (name, value) in pairs {
            match (name, value) {
                ("draft", OptionValue::Str(token)) => options.draft = token.parse()?,
                ("with_meta_schemas", OptionValue::Bool(b)) => options.with_meta_schemas = b,
                ("validate_formats", OptionValue::Bool(b)) => options.validate_formats = b,
                ("draft" | "with_meta_schemas" | "validate_formats", value) => {
                    return Err(Error::InvalidOption(format!(
                        "invalid value for option '{}': {}",
                        name, value
                    )));
                }
                (other, _) => {
                    return Err(Error::InvalidOption(format!("unknown option: '{}'", other)));
                }
            }
        }
        Ok(options)
    }
}
