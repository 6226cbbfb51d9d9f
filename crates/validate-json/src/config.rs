//! Validator options from a TOML file plus command-line overrides.

use anyhow::{Context, Result};
use json_schema_validation::{Draft, ValidatorOptions};
use std::fs;
use std::path::Path;

/// Load options from a TOML file such as
///
/// ```toml
/// draft = "draft202012"
/// validate_formats = true
/// ```
pub fn load(path: &Path) -> Result<ValidatorOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse(&text).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn parse(text: &str) -> Result<ValidatorOptions> {
    Ok(toml::from_str(text)?)
}

/// Options given as flags. Flags only switch features on, so an absent
/// flag keeps the config file's value.
#[derive(Debug, Default)]
pub struct Overrides {
    pub draft: Option<Draft>,
    pub with_meta_schemas: bool,
    pub validate_formats: bool,
}

impl Overrides {
    pub fn apply(&self, mut options: ValidatorOptions) -> ValidatorOptions {
        if let Some(draft) = self.draft {
            options.draft = draft;
        }
        options.with_meta_schemas |= self.with_meta_schemas;
        options.validate_formats |= self.validate_formats;
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let options = parse(r#"draft = "draft4""#).unwrap();
        assert_eq!(options.draft, Draft::Draft4);
        assert!(!options.with_meta_schemas);
        assert!(!options.validate_formats);
    }

    #[test]
    fn test_parse_rejects_unknown_draft_and_keys() {
        let err = parse(r#"draft = "draft5""#).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid draft: 'draft5'"));
        assert!(parse("strict = true").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let file = parse("draft = \"draft4\"\nvalidate_formats = true").unwrap();
        let overrides = Overrides {
            draft: Some(Draft::Draft202012),
            with_meta_schemas: true,
            validate_formats: false,
        };
        let options = overrides.apply(file);
        assert_eq!(options.draft, Draft::Draft202012);
        assert!(options.with_meta_schemas);
        assert!(options.validate_formats);
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let options = Overrides::default().apply(ValidatorOptions::default());
        assert_eq!(options, ValidatorOptions::default());
    }
}
