// Validator facade: one compiled schema, many instances

use crate::error::{Error, ValidationError};
use crate::options::ValidatorOptions;
use crate::schema::{CompiledSchema, compile};
use crate::validator;
use json_schema_value::{Value, parse};
use std::sync::Arc;

/// A compiled schema ready to validate instances.
///
/// Cloning is cheap; clones share the compiled schema.
///
/// ```
/// use json_schema_validation::{Validator, ValidatorOptions};
///
/// let validator = Validator::new(r#"{"type": "integer"}"#, ValidatorOptions::default()).unwrap();
/// assert!(validator.is_valid("42").unwrap());
///
/// let errors = validator.validate(r#""forty-two""#).unwrap();
/// assert_eq!(errors[0].to_string(), r#"path "/": "forty-two" is not of type "integer""#);
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    compiled: Arc<CompiledSchema>,
}

impl Validator {
    /// Parse and compile `schema`.
    pub fn new(schema: &str, options: ValidatorOptions) -> Result<Self, Error> {
        let value = parse(schema)?;
        Self::from_value(&value, options)
    }

    /// Compile an already parsed schema.
    pub fn from_value(schema: &Value, options: ValidatorOptions) -> Result<Self, Error> {
        let compiled = compile(schema, options)?;
        Ok(Self {
            compiled: Arc::new(compiled),
        })
    }

    /// Every error for the instance `text`, in deterministic order.
    pub fn validate(&self, text: &str) -> Result<Vec<ValidationError>, Error> {
        let instance = parse(text)?;
        Ok(self.validate_value(&instance))
    }

    pub fn is_valid(&self, text: &str) -> Result<bool, Error> {
        let instance = parse(text)?;
        Ok(self.is_valid_value(&instance))
    }

    pub fn validate_value(&self, instance: &Value) -> Vec<ValidationError> {
        validator::validate(&self.compiled, instance)
    }

    pub fn is_valid_value(&self, instance: &Value) -> bool {
        validator::is_valid(&self.compiled, instance)
    }

    pub fn options(&self) -> &ValidatorOptions {
        self.compiled.options()
    }

    pub fn compiled(&self) -> &CompiledSchema {
        &self.compiled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_validator_is_shareable() {
        assert_send_sync::<Validator>();
    }

    #[test]
    fn test_clones_share_the_compiled_schema() {
        let validator = Validator::new("{}", ValidatorOptions::default()).unwrap();
        let clone = validator.clone();
        assert!(Arc::ptr_eq(&validator.compiled, &clone.compiled));
    }

    #[test]
    fn test_instance_parse_error_does_not_poison() {
        let validator = Validator::new(r#"{"type": "string"}"#, ValidatorOptions::default()).unwrap();
        assert!(matches!(validator.validate("{"), Err(Error::JsonParse(_))));
        assert!(matches!(validator.is_valid("[1,]"), Err(Error::JsonParse(_))));
        assert_eq!(validator.is_valid(r#""ok""#), Ok(true));
    }
}
