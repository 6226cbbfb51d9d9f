use json_schema_validation::{
    Draft, Error, OptionValue, SchemaError, ValidationError, Validator, ValidatorOptions,
};
use std::thread;

const SCHEMA: &str = r#"{
    "properties": {
        "foo": {"type": "string"},
        "bar": {"type": "number"},
        "baz": {}
    },
    "required": ["baz"]
}"#;

fn render(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// ==================== Construction Tests ====================

#[test]
fn test_empty_schema_accepts_everything_for_every_draft() {
    let instances = [
        "null",
        "true",
        "0",
        "-1.5",
        r#""text""#,
        "[]",
        "{}",
        r#"{"a": [1, {"b": null}], "c": "d"}"#,
    ];
    for draft in Draft::ALL {
        let validator = Validator::new("{}", ValidatorOptions::default().with_draft(draft)).unwrap();
        for instance in instances {
            assert!(validator.is_valid(instance).unwrap(), "{} rejected {}", draft, instance);
            assert!(validator.validate(instance).unwrap().is_empty());
        }
    }
}

#[test]
fn test_unknown_type_name_is_a_schema_error_for_every_draft() {
    for draft in Draft::ALL {
        let result = Validator::new(
            r#"{"type": "invalidtype"}"#,
            ValidatorOptions::default().with_draft(draft),
        );
        match result {
            Err(Error::SchemaParse(SchemaError::InvalidType { name, location })) => {
                assert_eq!(name, "invalidtype");
                assert_eq!(location, "#/type");
            }
            other => panic!("{}: expected InvalidType, got {:?}", draft, other),
        }
    }
}

#[test]
fn test_invalid_draft_option() {
    let err = ValidatorOptions::from_pairs([("draft", OptionValue::from("foo"))]).unwrap_err();
    assert!(matches!(err, Error::InvalidOption(_)));
    assert_eq!(err.to_string(), "invalid draft: 'foo'");

    let err = "draft5".parse::<Draft>().unwrap_err();
    assert_eq!(err.to_string(), "invalid draft: 'draft5'");
}

#[test]
fn test_unknown_option_name() {
    let err = ValidatorOptions::from_pairs([("strict", OptionValue::from(true))]).unwrap_err();
    assert_eq!(err.to_string(), "unknown option: 'strict'");
}

#[test]
fn test_option_pairs() {
    let options = ValidatorOptions::from_pairs([
        ("draft", OptionValue::from("draft202012")),
        ("validate_formats", OptionValue::from(true)),
    ])
    .unwrap();
    assert_eq!(options.draft, Draft::Draft202012);
    assert!(!options.with_meta_schemas);
    assert!(options.validate_formats);
}

#[test]
fn test_options_deserialize_from_json() {
    let options: ValidatorOptions =
        serde_json::from_str(r#"{"draft": "draft4", "with_meta_schemas": true}"#).unwrap();
    assert_eq!(options.draft, Draft::Draft4);
    assert!(options.with_meta_schemas);
    assert!(!options.validate_formats);

    assert!(serde_json::from_str::<ValidatorOptions>(r#"{"draft": "draft5"}"#).is_err());
    assert!(serde_json::from_str::<ValidatorOptions>(r#"{"drafts": "draft4"}"#).is_err());
}

#[test]
fn test_schema_text_must_be_json() {
    let result = Validator::new(r#"{"type": "string""#, ValidatorOptions::default());
    assert!(matches!(result, Err(Error::JsonParse(_))));
}

#[test]
fn test_effective_options() {
    let validator = Validator::new("{}", ValidatorOptions::default()).unwrap();
    assert_eq!(
        validator.options(),
        &ValidatorOptions {
            draft: Draft::Draft7,
            with_meta_schemas: false,
            validate_formats: false,
        }
    );

    let options = ValidatorOptions::default()
        .with_draft(Draft::Draft4)
        .with_meta_schemas(true);
    let validator = Validator::new("{}", options).unwrap();
    assert_eq!(validator.options().draft, Draft::Draft4);
    assert!(validator.options().with_meta_schemas);
    assert_eq!(validator.compiled().draft(), Draft::Draft4);
}

// ==================== Validation Tests ====================

#[test]
fn test_valid_instance() {
    let validator = Validator::new(SCHEMA, ValidatorOptions::default()).unwrap();
    let instance = r#"{"foo": "foo", "bar": 1, "baz": "wadus"}"#;
    assert!(validator.validate(instance).unwrap().is_empty());
    assert!(validator.is_valid(instance).unwrap());
}

#[test]
fn test_three_errors() {
    let validator = Validator::new(SCHEMA, ValidatorOptions::default()).unwrap();
    let instance = r#"{"foo": 1, "bar": "wadus"}"#;
    let errors = validator.validate(instance).unwrap();
    insta::assert_snapshot!(render(&errors), @r#"
    path "/foo": 1 is not of type "string"
    path "/bar": "wadus" is not of type "number"
    path "/": "baz" is a required property
    "#);
    assert!(!validator.is_valid(instance).unwrap());
}

#[test]
fn test_error_paths() {
    let validator = Validator::new(SCHEMA, ValidatorOptions::default()).unwrap();
    let errors = validator.validate(r#"{"foo": 1, "baz": 0}"#).unwrap();
    assert_eq!(errors.len(), 1);
    let error = &errors[0];
    assert_eq!(error.instance_path.to_string(), "/foo");
    assert_eq!(error.schema_path.to_string(), "/properties/foo/type");
    assert_eq!(error.kind.keyword(), "type");
    assert_eq!(error.display_path(), "/foo");
}

#[test]
fn test_structured_error_record() {
    let validator = Validator::new(SCHEMA, ValidatorOptions::default()).unwrap();
    let errors = validator.validate(r#"{"bar": "wadus", "baz": 0}"#).unwrap();
    let record = serde_json::to_value(&errors[0]).unwrap();
    assert_eq!(record["instance_path"], "/bar");
    assert_eq!(record["schema_path"], "/properties/bar/type");
    assert_eq!(record["keyword"], "type");
    assert_eq!(record["kind"]["type"], "Type");
    assert_eq!(record["kind"]["data"]["expected"][0], "number");
    assert_eq!(record["message"], r#""wadus" is not of type "number""#);
    assert!(record.get("context").is_none());
}

#[test]
fn test_invalid_instance_json_always_fails() {
    let validator = Validator::new(SCHEMA, ValidatorOptions::default()).unwrap();
    assert!(validator.is_valid(r#"{"baz": 1}"#).unwrap());
    for text in ["{", r#"{"a": 1,}"#, r#""\x""#, "1 2", ""] {
        assert!(matches!(validator.validate(text), Err(Error::JsonParse(_))));
        assert!(matches!(validator.is_valid(text), Err(Error::JsonParse(_))));
    }
    assert!(validator.is_valid(r#"{"baz": 1}"#).unwrap());
}

#[test]
fn test_validation_is_deterministic() {
    let validator = Validator::new(SCHEMA, ValidatorOptions::default()).unwrap();
    let instance = r#"{"foo": 1, "bar": "wadus"}"#;
    let first = validator.validate(instance).unwrap();
    let second = validator.validate(instance).unwrap();
    assert_eq!(first, second);
    assert_eq!(render(&first), render(&second));
}

#[test]
fn test_concurrent_validation() {
    let validator = Validator::new(SCHEMA, ValidatorOptions::default()).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let validator = validator.clone();
            thread::spawn(move || {
                let instance = format!(r#"{{"foo": {}, "baz": null}}"#, i);
                validator.validate(&instance).unwrap().len()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
}
