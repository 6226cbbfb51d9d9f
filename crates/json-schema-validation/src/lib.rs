//! # json-schema-validation
//!
//! JSON Schema validation for drafts 4, 6, 7, 2019-09 and 2020-12.
//!
//! A schema is compiled once into an arena of typed rules, with every
//! `$ref`, `$dynamicRef` and `$recursiveRef` resolved to a node id up
//! front. Instances are then validated against it any number of times,
//! concurrently if needed.
//!
//! ## Design
//!
//! - [`draft`](Draft) holds the per-draft keyword tables and the embedded
//!   meta-schemas.
//! - The resolver walks the schema once, tracking `$id` scopes and
//!   anchors, and maps reference strings to locations.
//! - The compiler turns each subschema into a node. It rejects malformed
//!   keyword values, unresolvable references, and reference cycles that
//!   never descend into the instance.
//! - The validator walks an instance against the nodes, either collecting
//!   every error or stopping at the first.
//!
//! ## Example
//!
//! ```rust
//! use json_schema_validation::{Draft, Validator, ValidatorOptions};
//!
//! let schema = r#"{
//!     "type": "object",
//!     "properties": {"name": {"type": "string"}},
//!     "required": ["name"]
//! }"#;
//! let options = ValidatorOptions::default().with_draft(Draft::Draft202012);
//! let validator = Validator::new(schema, options).unwrap();
//!
//! let errors = validator.validate(r#"{"name": 7}"#).unwrap();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].to_string(), r#"path "/name": 7 is not of type "string""#);
//! ```

mod content;
mod draft;
mod error;
mod facade;
pub mod format;
mod options;
mod resolver;
mod schema;
mod validator;

pub use content::{ContentEncoding, MediaType};
pub use draft::{
    AnchorStyle, DependenciesStyle, Draft, DraftSpec, DynamicRefStyle, ItemsStyle, MetaSchema,
    lookup, meta_schemas,
};
pub use error::{Error, SchemaError, SchemaResult, ValidationError, ValidationErrorKind};
pub use facade::Validator;
pub use options::{OptionValue, ValidatorOptions};
pub use resolver::DEFAULT_BASE_URI;
pub use schema::{CompiledSchema, compile};
pub use validator::{is_valid, validate};

// Re-export the value model so callers need only this crate
pub use json_schema_value::{JsonPointer, Map, Number, ParseError, PathSegment, Value, parse};
