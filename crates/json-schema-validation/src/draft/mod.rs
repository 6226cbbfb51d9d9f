//! JSON Schema drafts and their capability tables.
//!
//! Each [`Draft`] maps to a static [`DraftSpec`] that answers every
//! draft-dependent question the resolver, compiler and validator ask:
//! which keywords exist, how `items` and `dependencies` are spelled, how
//! anchors and dynamic references work, and so on.

mod meta;

pub use meta::{MetaSchema, meta_schemas};

use crate::error::Error;
use json_schema_value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported JSON Schema draft.
///
/// Serializes as its option token (`"draft7"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Draft {
    Draft4,
    Draft6,
    #[default]
    Draft7,
    Draft201909,
    Draft202012,
}

impl Draft {
    pub const ALL: [Draft; 5] = [
        Draft::Draft4,
        Draft::Draft6,
        Draft::Draft7,
        Draft::Draft201909,
        Draft::Draft202012,
    ];

    /// The lowercase option token, e.g. `draft7`
    pub fn name(self) -> &'static str {
        match self {
            Draft::Draft4 => "draft4",
            Draft::Draft6 => "draft6",
            Draft::Draft7 => "draft7",
            Draft::Draft201909 => "draft201909",
            Draft::Draft202012 => "draft202012",
        }
    }

    pub fn spec(self) -> &'static DraftSpec {
        match self {
            Draft::Draft4 => &DRAFT4,
            Draft::Draft6 => &DRAFT6,
            Draft::Draft7 => &DRAFT7,
            Draft::Draft201909 => &DRAFT201909,
            Draft::Draft202012 => &DRAFT202012,
        }
    }

    /// Recognise a `$schema` value. A trailing empty fragment is ignored.
    pub fn from_meta_schema_uri(uri: &str) -> Option<Draft> {
        let uri = uri.strip_suffix('#').unwrap_or(uri);
        Draft::ALL
            .into_iter()
            .find(|draft| draft.spec().meta_schema_uri.trim_end_matches('#') == uri)
    }

    /// The draft's top-level meta-schema document
    pub fn meta_schema(self) -> &'static Value {
        meta::top_level(self)
    }
}

impl fmt::Display for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Draft {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Draft::ALL
            .into_iter()
            .find(|draft| draft.name() == lowered)
            .ok_or_else(|| Error::InvalidOption(format!("invalid draft: '{}'", s)))
    }
}

impl TryFrom<String> for Draft {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Draft> for String {
    fn from(draft: Draft) -> Self {
        draft.name().to_string()
    }
}

/// Look up a draft by its option token.
pub fn lookup(name: &str) -> Result<&'static DraftSpec, Error> {
    Ok(name.parse::<Draft>()?.spec())
}

/// How positional array schemas are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsStyle {
    /// `items` as an array, remainder in `additionalItems`
    ItemsArray,
    /// `prefixItems`, remainder in `items`
    PrefixItems,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependenciesStyle {
    /// One `dependencies` keyword holding arrays or schemas
    Combined,
    /// `dependentRequired` and `dependentSchemas`
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorStyle {
    /// A fragment-only identifier: `{"$id": "#name"}` (or `id` in draft 4)
    IdFragment,
    /// The `$anchor` keyword
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicRefStyle {
    None,
    /// `$recursiveRef` + `$recursiveAnchor: true`
    Recursive,
    /// `$dynamicRef` + `$dynamicAnchor`
    Dynamic,
}

/// How a keyword holds subschemas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubschemaShape {
    Single,
    /// Legacy `items`: a schema or an array of schemas
    SingleOrArray,
    Array,
    /// Object whose values are schemas
    Map,
    /// `dependencies`: values are schemas or property-name arrays
    Dependencies,
}

/// Capability table for one draft.
#[derive(Debug)]
pub struct DraftSpec {
    pub draft: Draft,
    pub meta_schema_uri: &'static str,
    /// `id` in draft 4, `$id` afterwards
    pub id_keyword: &'static str,
    pub keywords: &'static [&'static str],
    /// Draft 4 `exclusiveMinimum`/`exclusiveMaximum` are booleans
    /// modifying `minimum`/`maximum`
    pub boolean_exclusive_limits: bool,
    /// `$ref` hides every sibling keyword
    pub ref_overrides_siblings: bool,
    pub boolean_schemas: bool,
    pub items_style: ItemsStyle,
    pub dependencies_style: DependenciesStyle,
    pub anchor_style: AnchorStyle,
    pub dynamic_ref: DynamicRefStyle,
    /// `1.0` satisfies `"type": "integer"`
    pub integer_accepts_float: bool,
    /// `contentEncoding`/`contentMediaType` may assert
    pub content_assertions: bool,
}

impl DraftSpec {
    pub fn recognizes(&self, keyword: &str) -> bool {
        self.keywords.contains(&keyword)
    }

    pub(crate) fn subschema_shape(&self, keyword: &str) -> Option<SubschemaShape> {
        // `definitions` is traversed in every draft; later meta-schemas keep it
        if keyword == "definitions" {
            return Some(SubschemaShape::Map);
        }
        if !self.recognizes(keyword) {
            return None;
        }
        let shape = match keyword {
            "items" => match self.items_style {
                ItemsStyle::ItemsArray => SubschemaShape::SingleOrArray,
                ItemsStyle::PrefixItems => SubschemaShape::Single,
            },
            "additionalItems" | "additionalProperties" | "not" | "contains" | "propertyNames"
            | "if" | "then" | "else" | "unevaluatedItems" | "unevaluatedProperties"
            | "contentSchema" => SubschemaShape::Single,
            "allOf" | "anyOf" | "oneOf" | "prefixItems" => SubschemaShape::Array,
            "properties" | "patternProperties" | "$defs" | "dependentSchemas" => {
                SubschemaShape::Map
            }
            "dependencies" => SubschemaShape::Dependencies,
            _ => return None,
        };
        Some(shape)
    }
}

const DRAFT4_KEYWORDS: &[&str] = &[
    "id",
    "$schema",
    "$ref",
    "definitions",
    "type",
    "enum",
    "multipleOf",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
    "maxLength",
    "minLength",
    "pattern",
    "format",
    "items",
    "additionalItems",
    "maxItems",
    "minItems",
    "uniqueItems",
    "maxProperties",
    "minProperties",
    "required",
    "properties",
    "patternProperties",
    "additionalProperties",
    "dependencies",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
];

const DRAFT6_KEYWORDS: &[&str] = &[
    "$id",
    "$schema",
    "$ref",
    "definitions",
    "type",
    "enum",
    "const",
    "multipleOf",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
    "maxLength",
    "minLength",
    "pattern",
    "format",
    "contentEncoding",
    "contentMediaType",
    "items",
    "additionalItems",
    "maxItems",
    "minItems",
    "uniqueItems",
    "contains",
    "maxProperties",
    "minProperties",
    "required",
    "properties",
    "patternProperties",
    "additionalProperties",
    "dependencies",
    "propertyNames",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
];

const DRAFT7_KEYWORDS: &[&str] = &[
    "$id",
    "$schema",
    "$ref",
    "$comment",
    "definitions",
    "type",
    "enum",
    "const",
    "multipleOf",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
    "maxLength",
    "minLength",
    "pattern",
    "format",
    "contentEncoding",
    "contentMediaType",
    "items",
    "additionalItems",
    "maxItems",
    "minItems",
    "uniqueItems",
    "contains",
    "maxProperties",
    "minProperties",
    "required",
    "properties",
    "patternProperties",
    "additionalProperties",
    "dependencies",
    "propertyNames",
    "if",
    "then",
    "else",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
];

const DRAFT201909_KEYWORDS: &[&str] = &[
    "$id",
    "$schema",
    "$anchor",
    "$ref",
    "$recursiveRef",
    "$recursiveAnchor",
    "$vocabulary",
    "$comment",
    "$defs",
    "type",
    "enum",
    "const",
    "multipleOf",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
    "maxLength",
    "minLength",
    "pattern",
    "format",
    "contentEncoding",
    "contentMediaType",
    "contentSchema",
    "items",
    "additionalItems",
    "unevaluatedItems",
    "maxItems",
    "minItems",
    "uniqueItems",
    "contains",
    "maxContains",
    "minContains",
    "maxProperties",
    "minProperties",
    "required",
    "dependentRequired",
    "properties",
    "patternProperties",
    "additionalProperties",
    "unevaluatedProperties",
    "dependentSchemas",
    "propertyNames",
    "if",
    "then",
    "else",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
];

const DRAFT202012_KEYWORDS: &[&str] = &[
    "$id",
    "$schema",
    "$anchor",
    "$ref",
    "$dynamicRef",
    "$dynamicAnchor",
    "$vocabulary",
    "$comment",
    "$defs",
    "type",
    "enum",
    "const",
    "multipleOf",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
    "maxLength",
    "minLength",
    "pattern",
    "format",
    "contentEncoding",
    "contentMediaType",
    "contentSchema",
    "prefixItems",
    "items",
    "unevaluatedItems",
    "maxItems",
    "minItems",
    "uniqueItems",
    "contains",
    "maxContains",
    "minContains",
    "maxProperties",
    "minProperties",
    "required",
    "dependentRequired",
    "properties",
    "patternProperties",
    "additionalProperties",
    "unevaluatedProperties",
    "dependentSchemas",
    "propertyNames",
    "if",
    "then",
    "else",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
];

static DRAFT4: DraftSpec = DraftSpec {
    draft: Draft::Draft4,
    meta_schema_uri: "http://json-schema.org/draft-04/schema#",
    id_keyword: "id",
    keywords: DRAFT4_KEYWORDS,
    boolean_exclusive_limits: true,
    ref_overrides_siblings: true,
    boolean_schemas: false,
    items_style: ItemsStyle::ItemsArray,
    dependencies_style: DependenciesStyle::Combined,
    anchor_style: AnchorStyle::IdFragment,
    dynamic_ref: DynamicRefStyle::None,
    integer_accepts_float: false,
    content_assertions: false,
};

static DRAFT6: DraftSpec = DraftSpec {
    draft: Draft::Draft6,
    meta_schema_uri: "http://json-schema.org/draft-06/schema#",
    id_keyword: "$id",
    keywords: DRAFT6_KEYWORDS,
    boolean_exclusive_limits: false,
    ref_overrides_siblings: true,
    boolean_schemas: true,
    items_style: ItemsStyle::ItemsArray,
    dependencies_style: DependenciesStyle::Combined,
    anchor_style: AnchorStyle::IdFragment,
    dynamic_ref: DynamicRefStyle::None,
    integer_accepts_float: true,
    content_assertions: true,
};

static DRAFT7: DraftSpec = DraftSpec {
    draft: Draft::Draft7,
    meta_schema_uri: "http://json-schema.org/draft-07/schema#",
    id_keyword: "$id",
    keywords: DRAFT7_KEYWORDS,
    boolean_exclusive_limits: false,
    ref_overrides_siblings: true,
    boolean_schemas: true,
    items_style: ItemsStyle::ItemsArray,
    dependencies_style: DependenciesStyle::Combined,
    anchor_style: AnchorStyle::IdFragment,
    dynamic_ref: DynamicRefStyle::None,
    integer_accepts_float: true,
    content_assertions: true,
};

static DRAFT201909: DraftSpec = DraftSpec {
    draft: Draft::Draft201909,
    meta_schema_uri: "https://json-schema.org/draft/2019-09/schema",
    id_keyword: "$id",
    keywords: DRAFT201909_KEYWORDS,
    boolean_exclusive_limits: false,
    ref_overrides_siblings: false,
    boolean_schemas: true,
    items_style: ItemsStyle::ItemsArray,
    dependencies_style: DependenciesStyle::Split,
    anchor_style: AnchorStyle::Keyword,
    dynamic_ref: DynamicRefStyle::Recursive,
    integer_accepts_float: true,
    content_assertions: false,
};

static DRAFT202012: DraftSpec = DraftSpec {
    draft: Draft::Draft202012,
    meta_schema_uri: "https://json-schema.org/draft/2020-12/schema",
    id_keyword: "$id",
    keywords: DRAFT202012_KEYWORDS,
    boolean_exclusive_limits: false,
    ref_overrides_siblings: false,
    boolean_schemas: true,
    items_style: ItemsStyle::PrefixItems,
    dependencies_style: DependenciesStyle::Split,
    anchor_style: AnchorStyle::Keyword,
    dynamic_ref: DynamicRefStyle::Dynamic,
    integer_accepts_float: true,
    content_assertions: false,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_draft7() {
        assert_eq!(Draft::default(), Draft::Draft7);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("DRAFT4".parse::<Draft>().unwrap(), Draft::Draft4);
        assert_eq!("draft202012".parse::<Draft>().unwrap(), Draft::Draft202012);
    }

    #[test]
    fn test_unknown_draft_message() {
        let err = "foo".parse::<Draft>().unwrap_err();
        assert_eq!(err.to_string(), "invalid draft: 'foo'");
        assert!(matches!(err, Error::InvalidOption(_)));
    }

    #[test]
    fn test_name_round_trips() {
        for draft in Draft::ALL {
            assert_eq!(draft.name().parse::<Draft>().unwrap(), draft);
            assert_eq!(draft.spec().draft, draft);
        }
    }

    #[test]
    fn test_meta_schema_uri_lookup() {
        assert_eq!(
            Draft::from_meta_schema_uri("http://json-schema.org/draft-07/schema#"),
            Some(Draft::Draft7)
        );
        assert_eq!(
            Draft::from_meta_schema_uri("http://json-schema.org/draft-04/schema"),
            Some(Draft::Draft4)
        );
        assert_eq!(
            Draft::from_meta_schema_uri("https://json-schema.org/draft/2020-12/schema"),
            Some(Draft::Draft202012)
        );
        assert_eq!(Draft::from_meta_schema_uri("https://example.com/schema"), None);
    }

    #[test]
    fn test_capabilities_differ_by_draft() {
        assert_eq!(Draft::Draft4.spec().id_keyword, "id");
        assert!(!Draft::Draft4.spec().boolean_schemas);
        assert!(Draft::Draft7.spec().ref_overrides_siblings);
        assert!(!Draft::Draft201909.spec().ref_overrides_siblings);
        assert_eq!(Draft::Draft202012.spec().items_style, ItemsStyle::PrefixItems);
        assert!(Draft::Draft7.spec().recognizes("if"));
        assert!(!Draft::Draft6.spec().recognizes("if"));
        for draft in [Draft::Draft6, Draft::Draft7] {
            assert!(draft.spec().content_assertions);
            assert!(draft.spec().recognizes("contentEncoding"));
            assert!(draft.spec().recognizes("contentMediaType"));
        }
    }

    #[test]
    fn test_subschema_shapes() {
        let d7 = Draft::Draft7.spec();
        assert_eq!(d7.subschema_shape("items"), Some(SubschemaShape::SingleOrArray));
        assert_eq!(d7.subschema_shape("definitions"), Some(SubschemaShape::Map));
        assert_eq!(d7.subschema_shape("$defs"), None);
        assert_eq!(d7.subschema_shape("title"), None);
        let d2020 = Draft::Draft202012.spec();
        assert_eq!(d2020.subschema_shape("items"), Some(SubschemaShape::Single));
        assert_eq!(d2020.subschema_shape("prefixItems"), Some(SubschemaShape::Array));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("draft6").unwrap().draft, Draft::Draft6);
        assert!(lookup("draft5").is_err());
    }
}
