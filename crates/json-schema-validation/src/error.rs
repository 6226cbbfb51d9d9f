// Error types for schema compilation and validation

use json_schema_value::{JsonPointer, Number, ParseError, Value};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use thiserror::Error;

/// Errors raised while compiling a schema document.
///
/// `location` is the schema position as a URI fragment, e.g.
/// `#/properties/name/type`. Positions inside embedded meta-schemas are
/// prefixed with the meta-schema URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// `type` names something that is not a JSON Schema type
    #[error("Invalid schema type '{name}' (at {location})")]
    InvalidType { name: String, location: String },

    /// A keyword value has the wrong shape
    #[error("Invalid schema structure: {message} (at {location})")]
    InvalidStructure { message: String, location: String },

    /// `pattern` or a `patternProperties` key is not a valid regex
    #[error("Invalid regular expression '{pattern}' (at {location}): {message}")]
    InvalidPattern {
        pattern: String,
        message: String,
        location: String,
    },

    #[error("Unresolved reference '{reference}' (at {location})")]
    UnresolvedReference { reference: String, location: String },

    /// A reference cycle that never descends into the instance
    #[error("Cyclic reference without progress through the instance (at {location})")]
    CyclicReference { location: String },

    /// Draft 4 only allows booleans as `additionalProperties`/`additionalItems`
    #[error("Boolean schemas are not allowed in draft4 (at {location})")]
    UnsupportedBooleanSchema { location: String },

    #[error("Invalid URI '{uri}' (at {location}): {message}")]
    InvalidUri {
        uri: String,
        message: String,
        location: String,
    },
}

/// Result type for schema compilation
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors surfaced by the [`Validator`](crate::Validator) facade.
///
/// Validation failures are not errors: they come back as a list of
/// [`ValidationError`] values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Schema or instance text is not valid JSON
    #[error("{0}")]
    JsonParse(#[from] ParseError),

    /// The schema parsed as JSON but is not a usable schema
    #[error("{0}")]
    SchemaParse(#[from] SchemaError),

    /// Unknown draft or option name
    #[error("{0}")]
    InvalidOption(String),
}

/// Structured validation error kinds
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ValidationErrorKind {
    /// The `false` schema
    FalseSchema,

    Type { expected: Vec<String> },

    Enum { options: Value },

    Const { expected: Value },

    Minimum { limit: Number },

    Maximum { limit: Number },

    ExclusiveMinimum { limit: Number },

    ExclusiveMaximum { limit: Number },

    MultipleOf { multiple_of: Number },

    MinLength { limit: u64 },

    MaxLength { limit: u64 },

    Pattern { pattern: String },

    Format { format: String },

    ContentEncoding { encoding: String },

    ContentMediaType { media_type: String },

    MinItems { limit: u64 },

    MaxItems { limit: u64 },

    UniqueItems,

    /// Items past the positional schemas when the rest is `false`
    AdditionalItems { unexpected: Vec<Value> },

    /// No item matched `contains`
    Contains,

    MinContains { limit: u64 },

    MaxContains { limit: u64 },

    /// Missing property, from `required`, `dependencies` or `dependentRequired`
    Required { property: String },

    MinProperties { limit: u64 },

    MaxProperties { limit: u64 },

    AdditionalProperties { unexpected: Vec<String> },

    UnevaluatedProperties { unexpected: Vec<String> },

    UnevaluatedItems { unexpected: Vec<Value> },

    Not { schema: Value },

    AnyOf,

    OneOfNotValid,

    OneOfMultipleValid,
}

impl ValidationErrorKind {
    /// The schema keyword that produced this error
    pub fn keyword(&self) -> &'static str {
        match self {
            ValidationErrorKind::FalseSchema => "false",
            ValidationErrorKind::Type { .. } => "type",
            ValidationErrorKind::Enum { .. } => "enum",
            ValidationErrorKind::Const { .. } => "const",
            ValidationErrorKind::Minimum { .. } => "minimum",
            ValidationErrorKind::Maximum { .. } => "maximum",
            ValidationErrorKind::ExclusiveMinimum { .. } => "exclusiveMinimum",
            ValidationErrorKind::ExclusiveMaximum { .. } => "exclusiveMaximum",
            ValidationErrorKind::MultipleOf { .. } => "multipleOf",
            ValidationErrorKind::MinLength { .. } => "minLength",
            ValidationErrorKind::MaxLength { .. } => "maxLength",
            ValidationErrorKind::Pattern { .. } => "pattern",
            ValidationErrorKind::Format { .. } => "format",
            ValidationErrorKind::ContentEncoding { .. } => "contentEncoding",
            ValidationErrorKind::ContentMediaType { .. } => "contentMediaType",
            ValidationErrorKind::MinItems { .. } => "minItems",
            ValidationErrorKind::MaxItems { .. } => "maxItems",
            ValidationErrorKind::UniqueItems => "uniqueItems",
            ValidationErrorKind::AdditionalItems { .. } => "additionalItems",
            ValidationErrorKind::Contains => "contains",
            ValidationErrorKind::MinContains { .. } => "minContains",
            ValidationErrorKind::MaxContains { .. } => "maxContains",
            ValidationErrorKind::Required { .. } => "required",
            ValidationErrorKind::MinProperties { .. } => "minProperties",
            ValidationErrorKind::MaxProperties { .. } => "maxProperties",
            ValidationErrorKind::AdditionalProperties { .. } => "additionalProperties",
            ValidationErrorKind::UnevaluatedProperties { .. } => "unevaluatedProperties",
            ValidationErrorKind::UnevaluatedItems { .. } => "unevaluatedItems",
            ValidationErrorKind::Not { .. } => "not",
            ValidationErrorKind::AnyOf => "anyOf",
            ValidationErrorKind::OneOfNotValid | ValidationErrorKind::OneOfMultipleValid => "oneOf",
        }
    }

    /// Format a human-readable message for the offending instance
    pub fn message(&self, instance: &Value) -> String {
        match self {
            ValidationErrorKind::FalseSchema => format!("False schema does not allow {}", instance),
            ValidationErrorKind::Type { expected } => {
                if let [single] = expected.as_slice() {
                    format!("{} is not of type \"{}\"", instance, single)
                } else {
                    let names: Vec<String> =
                        expected.iter().map(|name| format!("\"{}\"", name)).collect();
                    format!("{} is not of types {}", instance, names.join(", "))
                }
            }
            ValidationErrorKind::Enum { options } => {
                format!("{} is not one of {}", instance, options)
            }
            ValidationErrorKind::Const { expected } => format!("{} was expected", expected),
            ValidationErrorKind::Minimum { limit } => {
                format!("{} is less than the minimum of {}", instance, limit)
            }
            ValidationErrorKind::Maximum { limit } => {
                format!("{} is greater than the maximum of {}", instance, limit)
            }
            ValidationErrorKind::ExclusiveMinimum { limit } => {
                format!("{} is less than or equal to the minimum of {}", instance, limit)
            }
            ValidationErrorKind::ExclusiveMaximum { limit } => {
                format!("{} is greater than or equal to the maximum of {}", instance, limit)
            }
            ValidationErrorKind::MultipleOf { multiple_of } => {
                format!("{} is not a multiple of {}", instance, multiple_of)
            }
            ValidationErrorKind::MinLength { limit } => format!(
                "{} is shorter than {} character{}",
                instance,
                limit,
                plural(*limit)
            ),
            ValidationErrorKind::MaxLength { limit } => format!(
                "{} is longer than {} character{}",
                instance,
                limit,
                plural(*limit)
            ),
            ValidationErrorKind::Pattern { pattern } => {
                format!("{} does not match \"{}\"", instance, pattern)
            }
            ValidationErrorKind::Format { format } => {
                format!("{} is not a \"{}\"", instance, format)
            }
            ValidationErrorKind::ContentEncoding { encoding } => format!(
                "{} is not compliant with \"{}\" content encoding",
                instance, encoding
            ),
            ValidationErrorKind::ContentMediaType { media_type } => format!(
                "{} is not compliant with \"{}\" media type",
                instance, media_type
            ),
            ValidationErrorKind::MinItems { limit } => format!(
                "{} has less than {} item{}",
                instance,
                limit,
                plural(*limit)
            ),
            ValidationErrorKind::MaxItems { limit } => format!(
                "{} has more than {} item{}",
                instance,
                limit,
                plural(*limit)
            ),
            ValidationErrorKind::UniqueItems => format!("{} has non-unique elements", instance),
            ValidationErrorKind::AdditionalItems { unexpected } => format!(
                "Additional items are not allowed ({} {} unexpected)",
                join_values(unexpected),
                was_were(unexpected.len())
            ),
            ValidationErrorKind::Contains => {
                format!("None of {} are valid under the given schema", instance)
            }
            ValidationErrorKind::MinContains { limit } => format!(
                "{} contains fewer than {} matching item{}",
                instance,
                limit,
                plural(*limit)
            ),
            ValidationErrorKind::MaxContains { limit } => format!(
                "{} contains more than {} matching item{}",
                instance,
                limit,
                plural(*limit)
            ),
            ValidationErrorKind::Required { property } => {
                format!("{} is a required property", Value::from(property.as_str()))
            }
            ValidationErrorKind::MinProperties { limit } => format!(
                "{} has less than {} propert{}",
                instance,
                limit,
                if *limit == 1 { "y" } else { "ies" }
            ),
            ValidationErrorKind::MaxProperties { limit } => format!(
                "{} has more than {} propert{}",
                instance,
                limit,
                if *limit == 1 { "y" } else { "ies" }
            ),
            ValidationErrorKind::AdditionalProperties { unexpected } => format!(
                "Additional properties are not allowed ({} {} unexpected)",
                join_keys(unexpected),
                was_were(unexpected.len())
            ),
            ValidationErrorKind::UnevaluatedProperties { unexpected } => format!(
                "Unevaluated properties are not allowed ({} {} unexpected)",
                join_keys(unexpected),
                was_were(unexpected.len())
            ),
            ValidationErrorKind::UnevaluatedItems { unexpected } => format!(
                "Unevaluated items are not allowed ({} {} unexpected)",
                join_values(unexpected),
                was_were(unexpected.len())
            ),
            ValidationErrorKind::Not { schema } => {
                format!("{} is not allowed for {}", schema, instance)
            }
            ValidationErrorKind::AnyOf => format!(
                "{} is not valid under any of the schemas listed in the 'anyOf' keyword",
                instance
            ),
            ValidationErrorKind::OneOfNotValid => format!(
                "{} is not valid under any of the schemas listed in the 'oneOf' keyword",
                instance
            ),
            ValidationErrorKind::OneOfMultipleValid => format!(
                "{} is valid under more than one of the schemas listed in the 'oneOf' keyword",
                instance
            ),
        }
    }
}

fn plural(count: u64) -> &'static str {
    if count == 1 { "" } else { "s" }
}

fn was_were(count: usize) -> &'static str {
    if count == 1 { "was" } else { "were" }
}

fn join_keys(keys: &[String]) -> String {
    keys.iter()
        .map(|key| format!("'{}'", key))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single schema violation.
///
/// `instance_path` points into the validated document, `schema_path`
/// is the keyword path taken through the schema (references included).
/// `context` holds the per-branch errors of a failed `anyOf`/`oneOf`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub instance: Value,
    pub instance_path: JsonPointer,
    pub schema_path: JsonPointer,
    pub context: Vec<ValidationError>,
}

impl ValidationError {
    pub fn new(
        kind: ValidationErrorKind,
        instance: Value,
        instance_path: JsonPointer,
        schema_path: JsonPointer,
    ) -> Self {
        Self {
            kind,
            instance,
            instance_path,
            schema_path,
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: Vec<ValidationError>) -> Self {
        self.context = context;
        self
    }

    /// Get the human-readable message for this error
    pub fn message(&self) -> String {
        self.kind.message(&self.instance)
    }

    /// The instance pointer as displayed: `/` for the document root
    pub fn display_path(&self) -> String {
        if self.instance_path.is_empty() {
            "/".to_string()
        } else {
            self.instance_path.to_string()
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path \"{}\": {}", self.display_path(), self.message())
    }
}

impl std::error::Error for ValidationError {}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.context.is_empty() { 5 } else { 6 };
        let mut state = serializer.serialize_struct("ValidationError", fields)?;
        state.serialize_field("instance_path", &self.instance_path)?;
        state.serialize_field("schema_path", &self.schema_path)?;
        state.serialize_field("keyword", self.kind.keyword())?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("message", &self.message())?;
        if !self.context.is_empty() {
            state.serialize_field("context", &self.context)?;
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_schema_value::parse;

    fn err(kind: ValidationErrorKind, instance: &str) -> ValidationError {
        ValidationError::new(
            kind,
            parse(instance).unwrap(),
            JsonPointer::new(),
            JsonPointer::new(),
        )
    }

    #[test]
    fn test_root_path_renders_as_slash() {
        let e = err(ValidationErrorKind::FalseSchema, "1");
        assert_eq!(e.to_string(), "path \"/\": False schema does not allow 1");
    }

    #[test]
    fn test_nested_path_rendering() {
        let mut e = err(
            ValidationErrorKind::Type {
                expected: vec!["string".into()],
            },
            "1",
        );
        e.instance_path = JsonPointer::new().join("foo").join(0);
        assert_eq!(e.to_string(), "path \"/foo/0\": 1 is not of type \"string\"");
    }

    #[test]
    fn test_multi_type_message() {
        let e = err(
            ValidationErrorKind::Type {
                expected: vec!["string".into(), "null".into()],
            },
            "1",
        );
        assert_eq!(e.message(), "1 is not of types \"string\", \"null\"");
    }

    #[test]
    fn test_plural_forms() {
        let one = err(ValidationErrorKind::MinItems { limit: 1 }, "[]");
        assert_eq!(one.message(), "[] has less than 1 item");
        let two = err(ValidationErrorKind::MaxLength { limit: 2 }, "\"abc\"");
        assert_eq!(two.message(), "\"abc\" is longer than 2 characters");
        let props = err(ValidationErrorKind::MinProperties { limit: 1 }, "{}");
        assert_eq!(props.message(), "{} has less than 1 property");
    }

    #[test]
    fn test_additional_properties_message() {
        let one = err(
            ValidationErrorKind::AdditionalProperties {
                unexpected: vec!["a".into()],
            },
            "{}",
        );
        assert_eq!(
            one.message(),
            "Additional properties are not allowed ('a' was unexpected)"
        );
        let two = err(
            ValidationErrorKind::AdditionalProperties {
                unexpected: vec!["a".into(), "b".into()],
            },
            "{}",
        );
        assert_eq!(
            two.message(),
            "Additional properties are not allowed ('a', 'b' were unexpected)"
        );
    }

    #[test]
    fn test_required_message_quotes_key() {
        let e = err(
            ValidationErrorKind::Required {
                property: "baz".into(),
            },
            "{}",
        );
        assert_eq!(e.message(), "\"baz\" is a required property");
    }

    #[test]
    fn test_serialized_record() {
        let mut e = err(
            ValidationErrorKind::Required {
                property: "a".into(),
            },
            "{}",
        );
        e.schema_path = JsonPointer::new().join("required");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["instance_path"], "");
        assert_eq!(json["schema_path"], "/required");
        assert_eq!(json["keyword"], "required");
        assert_eq!(json["kind"]["type"], "Required");
        assert_eq!(json["kind"]["data"]["property"], "a");
        assert_eq!(json["message"], "\"a\" is a required property");
        assert!(json.get("context").is_none());
    }

    #[test]
    fn test_facade_error_display_is_transparent() {
        let e = Error::InvalidOption("invalid draft: 'foo'".into());
        assert_eq!(e.to_string(), "invalid draft: 'foo'");
    }
}
