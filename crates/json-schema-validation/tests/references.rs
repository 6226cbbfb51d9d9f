use json_schema_validation::{
    Draft, Error, SchemaError, ValidationError, Validator, ValidatorOptions, parse,
};

fn validator(draft: Draft, schema: &str) -> Validator {
    Validator::new(schema, ValidatorOptions::default().with_draft(draft)).unwrap()
}

fn compile_error(draft: Draft, schema: &str) -> SchemaError {
    match Validator::new(schema, ValidatorOptions::default().with_draft(draft)) {
        Err(Error::SchemaParse(err)) => err,
        other => panic!("expected a schema error, got {:?}", other),
    }
}

fn render(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// ==================== $ref Tests ====================

#[test]
fn test_ref_adds_keyword_to_schema_path() {
    let schema = r##"{
        "definitions": {"s": {"type": "string"}},
        "properties": {"a": {"$ref": "#/definitions/s"}}
    }"##;
    let errors = validator(Draft::Draft7, schema).validate(r#"{"a": 1}"#).unwrap();
    insta::assert_snapshot!(render(&errors), @r#"path "/a": 1 is not of type "string""#);
    assert_eq!(errors[0].schema_path.to_string(), "/properties/a/$ref/type");
    assert_eq!(errors[0].instance_path.to_string(), "/a");
}

#[test]
fn test_ref_siblings_ignored_until_2019_09() {
    let schema = r##"{
        "definitions": {"s": {"type": "string"}},
        "$ref": "#/definitions/s",
        "maxLength": 1
    }"##;
    for draft in [Draft::Draft4, Draft::Draft6, Draft::Draft7] {
        let validator = validator(draft, schema);
        assert!(validator.is_valid(r#""abc""#).unwrap());
        assert!(!validator.is_valid("1").unwrap());
    }
    insta::allow_duplicates! {
        for draft in [Draft::Draft201909, Draft::Draft202012] {
            let errors = validator(draft, schema).validate(r#""abc""#).unwrap();
            insta::assert_snapshot!(render(&errors), @r#"path "/": "abc" is longer than 1 character"#);
        }
    }
}

#[test]
fn test_recursive_tree() {
    let schema = r##"{"type": ["integer", "array"], "items": {"$ref": "#"}}"##;
    let validator = validator(Draft::Draft7, schema);
    assert!(validator.is_valid("[1, [2, [3, []]]]").unwrap());
    let errors = validator.validate(r#"[1, [2, [3, "x"]]]"#).unwrap();
    insta::assert_snapshot!(render(&errors), @r#"path "/1/1/1": "x" is not of types "integer", "array""#);
    assert_eq!(errors[0].schema_path.to_string(), "/items/$ref/items/$ref/items/$ref/type");
}

#[test]
fn test_recursive_schema_compiles_once() {
    let schema = r##"{
        "definitions": {
            "node": {
                "type": "object",
                "properties": {
                    "value": {"type": "integer"},
                    "next": {"$ref": "#/definitions/node"}
                }
            }
        },
        "$ref": "#/definitions/node"
    }"##;
    let validator = validator(Draft::Draft7, schema);
    // root, node, value, next
    assert_eq!(validator.compiled().node_count(), 4);
    let errors = validator
        .validate(r#"{"value": 1, "next": {"value": 2, "next": {"value": "3"}}}"#)
        .unwrap();
    insta::assert_snapshot!(render(&errors), @r#"path "/next/next/value": "3" is not of type "integer""#);
}

#[test]
fn test_direct_self_reference_is_rejected() {
    for draft in Draft::ALL {
        let err = compile_error(draft, r##"{"$ref": "#"}"##);
        assert!(matches!(err, SchemaError::CyclicReference { .. }), "{}: {:?}", draft, err);
    }
}

#[test]
fn test_indirect_in_place_cycles_are_rejected() {
    let schema = r##"{
        "definitions": {
            "a": {"$ref": "#/definitions/b"},
            "b": {"allOf": [{"$ref": "#/definitions/a"}]}
        },
        "$ref": "#/definitions/a"
    }"##;
    let err = compile_error(Draft::Draft7, schema);
    assert!(matches!(err, SchemaError::CyclicReference { .. }));

    let err = compile_error(Draft::Draft202012, r##"{"anyOf": [{"$ref": "#"}]}"##);
    assert!(matches!(err, SchemaError::CyclicReference { .. }));
}

#[test]
fn test_unresolved_reference() {
    let err = compile_error(Draft::Draft7, r##"{"properties": {"a": {"$ref": "#/definitions/missing"}}}"##);
    match err {
        SchemaError::UnresolvedReference { reference, location } => {
            assert_eq!(reference, "#/definitions/missing");
            assert_eq!(location, "#/properties/a/$ref");
        }
        other => panic!("expected UnresolvedReference, got {:?}", other),
    }

    let err = compile_error(Draft::Draft7, r#"{"$ref": "http://example.com/elsewhere.json"}"#);
    assert!(matches!(err, SchemaError::UnresolvedReference { .. }));
}

#[test]
fn test_pointer_escaping_in_references() {
    let schema = r##"{
        "$defs": {
            "a/b": {"type": "integer"},
            "c%d": {"type": "string"},
            "t~n": {"type": "null"}
        },
        "properties": {
            "x": {"$ref": "#/$defs/a~1b"},
            "y": {"$ref": "#/$defs/c%25d"},
            "z": {"$ref": "#/$defs/t~0n"}
        }
    }"##;
    let validator = validator(Draft::Draft202012, schema);
    assert!(validator.is_valid(r#"{"x": 1, "y": "s", "z": null}"#).unwrap());
    let errors = validator.validate(r#"{"x": "1", "y": 2, "z": 3}"#).unwrap();
    insta::assert_snapshot!(render(&errors), @r#"
    path "/x": "1" is not of type "integer"
    path "/y": 2 is not of type "string"
    path "/z": 3 is not of type "null"
    "#);
}

// ==================== $id Tests ====================

#[test]
fn test_nested_id_is_a_resolution_base() {
    let schema = r#"{
        "$id": "http://example.com/root.json",
        "definitions": {
            "item": {"$id": "item.json", "type": "integer"},
            "nested": {
                "$id": "nested/",
                "definitions": {"leaf": {"$id": "leaf.json", "type": "string"}}
            }
        },
        "properties": {
            "items": {"items": {"$ref": "item.json"}},
            "leaf": {"$ref": "http://example.com/nested/leaf.json"}
        }
    }"#;
    let validator = validator(Draft::Draft7, schema);
    let errors = validator.validate(r#"{"items": [1, "a"], "leaf": 3}"#).unwrap();
    insta::assert_snapshot!(render(&errors), @r#"
    path "/items/1": "a" is not of type "integer"
    path "/leaf": 3 is not of type "string"
    "#);
}

#[test]
fn test_draft4_id_keyword() {
    let schema = r#"{
        "id": "http://example.com/root.json",
        "definitions": {"item": {"id": "item.json", "type": "integer"}},
        "items": {"$ref": "item.json"}
    }"#;
    let validator = validator(Draft::Draft4, schema);
    assert!(validator.is_valid("[1, 2]").unwrap());
    assert!(!validator.is_valid(r#"["a"]"#).unwrap());
}

#[test]
fn test_anchors() {
    let schema = r##"{
        "$defs": {"n": {"$anchor": "num", "type": "number"}},
        "$ref": "#num"
    }"##;
    let errors = validator(Draft::Draft202012, schema).validate(r#""x""#).unwrap();
    insta::assert_snapshot!(render(&errors), @r#"path "/": "x" is not of type "number""#);

    // drafts 6 and 7 spell anchors as fragment-only ids
    let schema = r##"{
        "definitions": {"n": {"$id": "#num", "type": "number"}},
        "$ref": "#num"
    }"##;
    assert!(!validator(Draft::Draft7, schema).is_valid(r#""x""#).unwrap());
    assert!(validator(Draft::Draft7, schema).is_valid("1").unwrap());
}

#[test]
fn test_nested_schema_keyword_switches_draft() {
    let schema = r#"{
        "properties": {
            "n": {"$schema": "http://json-schema.org/draft-04/schema#", "type": "integer"},
            "m": {"type": "integer"}
        }
    }"#;
    let validator = validator(Draft::Draft7, schema);
    let errors = validator.validate(r#"{"n": 1.0, "m": 1.0}"#).unwrap();
    insta::assert_snapshot!(render(&errors), @r#"path "/n": 1.0 is not of type "integer""#);
}

// ==================== Meta-schema Reference Tests ====================

#[test]
fn test_meta_schema_refs_need_preloading() {
    let schema = r#"{"$ref": "http://json-schema.org/draft-07/schema#"}"#;
    let err = compile_error(Draft::Draft7, schema);
    assert!(matches!(err, SchemaError::UnresolvedReference { .. }));

    let options = ValidatorOptions::default().with_meta_schemas(true);
    let validator = Validator::new(schema, options).unwrap();
    assert!(validator.is_valid(r#"{"type": "string"}"#).unwrap());
    assert!(!validator.is_valid(r#"{"type": 5}"#).unwrap());
    assert!(!validator.is_valid(r#"{"minLength": -1}"#).unwrap());
}

#[test]
fn test_2020_12_meta_schema_ref() {
    let schema = r#"{
        "properties": {
            "schema": {"$ref": "https://json-schema.org/draft/2020-12/schema"}
        }
    }"#;
    let options = ValidatorOptions::default()
        .with_draft(Draft::Draft202012)
        .with_meta_schemas(true);
    let validator = Validator::new(schema, options).unwrap();
    assert!(validator.is_valid(r#"{"schema": {"prefixItems": [true]}}"#).unwrap());
    assert!(!validator.is_valid(r#"{"schema": {"prefixItems": true}}"#).unwrap());
    assert!(!validator.is_valid(r#"{"schema": {"properties": {"a": 1}}}"#).unwrap());
}

// ==================== Dynamic Reference Tests ====================

const STRICT_TREE_2020: &str = r##"{
    "$id": "https://example.com/strict-tree",
    "$dynamicAnchor": "node",
    "$ref": "tree",
    "unevaluatedProperties": false,
    "$defs": {
        "tree": {
            "$id": "https://example.com/tree",
            "$dynamicAnchor": "node",
            "type": "object",
            "properties": {
                "data": true,
                "children": {"type": "array", "items": {"$dynamicRef": "#node"}}
            }
        }
    }
}"##;

#[test]
fn test_dynamic_ref_extends_recursive_schema() {
    let validator = validator(Draft::Draft202012, STRICT_TREE_2020);
    assert!(validator
        .is_valid(r#"{"data": 1, "children": [{"data": 2, "children": []}]}"#)
        .unwrap());

    let errors = validator.validate(r#"{"children": [{"daat": 1}]}"#).unwrap();
    insta::assert_snapshot!(
        render(&errors),
        @"path \"/children/0\": Unevaluated properties are not allowed ('daat' was unexpected)"
    );
    assert_eq!(
        errors[0].schema_path.to_string(),
        "/$ref/properties/children/items/$dynamicRef/unevaluatedProperties"
    );
}

#[test]
fn test_dynamic_ref_without_extension() {
    let tree = parse(STRICT_TREE_2020).unwrap();
    let inner = tree.pointer("/$defs/tree").unwrap();
    let options = ValidatorOptions::default().with_draft(Draft::Draft202012);
    let validator = Validator::from_value(inner, options).unwrap();
    assert!(validator.is_valid(r#"{"children": [{"daat": 1}]}"#).unwrap());
    assert!(!validator.is_valid(r#"{"children": [5]}"#).unwrap());
}

#[test]
fn test_recursive_ref_extends_recursive_schema() {
    let schema = r##"{
        "$id": "https://example.com/strict-tree",
        "$recursiveAnchor": true,
        "$ref": "tree",
        "unevaluatedProperties": false,
        "$defs": {
            "tree": {
                "$id": "https://example.com/tree",
                "$recursiveAnchor": true,
                "type": "object",
                "properties": {
                    "data": true,
                    "children": {"type": "array", "items": {"$recursiveRef": "#"}}
                }
            }
        }
    }"##;
    let validator = validator(Draft::Draft201909, schema);
    assert!(validator.is_valid(r#"{"children": [{"data": 1}]}"#).unwrap());
    let errors = validator.validate(r#"{"children": [{"daat": 1}]}"#).unwrap();
    insta::assert_snapshot!(
        render(&errors),
        @"path \"/children/0\": Unevaluated properties are not allowed ('daat' was unexpected)"
    );
}

#[test]
fn test_recursive_ref_without_anchor_is_static() {
    let schema = r##"{
        "type": "object",
        "properties": {"next": {"$recursiveRef": "#"}, "n": {"type": "integer"}}
    }"##;
    let validator = validator(Draft::Draft201909, schema);
    let errors = validator.validate(r#"{"next": {"next": {"n": "x"}}}"#).unwrap();
    insta::assert_snapshot!(render(&errors), @r#"path "/next/next/n": "x" is not of type "integer""#);
}
