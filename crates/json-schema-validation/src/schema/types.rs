//! Compiled schema representation
//!
//! A compiled schema is an arena of [`SchemaNode`]s addressed by
//! [`NodeId`]. References are stored as node ids, so recursive schemas
//! need no back-pointers.

use crate::content::{ContentEncoding, MediaType};
use crate::format::Format;
use crate::resolver::ResourceId;
use json_schema_value::{Number, Value};
use fancy_regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug)]
pub(crate) struct SchemaNode {
    /// Resource the subschema belongs to; entered into the dynamic scope
    pub resource: ResourceId,
    pub body: NodeBody,
}

#[derive(Debug)]
pub(crate) enum NodeBody {
    Bool(bool),
    /// Keyword rules in document order
    Rules(Vec<Rule>),
}

/// The seven JSON Schema primitive type names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrimitiveType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl PrimitiveType {
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "array" => PrimitiveType::Array,
            "boolean" => PrimitiveType::Boolean,
            "integer" => PrimitiveType::Integer,
            "null" => PrimitiveType::Null,
            "number" => PrimitiveType::Number,
            "object" => PrimitiveType::Object,
            "string" => PrimitiveType::String,
            _ => return None,
        };
        Some(ty)
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Array => "array",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Null => "null",
            PrimitiveType::Number => "number",
            PrimitiveType::Object => "object",
            PrimitiveType::String => "string",
        }
    }

    pub fn matches(self, value: &Value, integer_accepts_float: bool) -> bool {
        match (self, value) {
            (PrimitiveType::Array, Value::Array(_))
            | (PrimitiveType::Boolean, Value::Bool(_))
            | (PrimitiveType::Null, Value::Null)
            | (PrimitiveType::Number, Value::Number(_))
            | (PrimitiveType::Object, Value::Object(_))
            | (PrimitiveType::String, Value::String(_)) => true,
            (PrimitiveType::Integer, Value::Number(n)) => {
                n.is_integer() || (integer_accepts_float && n.is_integer_valued())
            }
            _ => false,
        }
    }
}

/// `properties`, `patternProperties` and `additionalProperties`, applied
/// together because the last depends on the first two.
#[derive(Debug)]
pub(crate) struct PropertiesRule {
    /// In schema order
    pub properties: Vec<(String, NodeId)>,
    pub patterns: Vec<(Regex, String, NodeId)>,
    pub additional: Option<NodeId>,
}

impl PropertiesRule {
    /// Whether `key` is covered by `properties` or `patternProperties`
    pub fn matches_key(&self, key: &str) -> bool {
        self.properties.iter().any(|(name, _)| name == key)
            || self
                .patterns
                .iter()
                .any(|(regex, _, _)| regex.is_match(key).unwrap_or(false))
    }
}

/// Positional and trailing array item schemas.
///
/// Legacy drafts spell this `items` (array) + `additionalItems`, or a
/// single `items` schema; 2020-12 spells it `prefixItems` + `items`.
#[derive(Debug)]
pub(crate) struct ItemsRule {
    pub prefix: Vec<NodeId>,
    pub prefix_keyword: &'static str,
    pub rest: Option<NodeId>,
    pub rest_keyword: &'static str,
}

#[derive(Debug)]
pub(crate) enum Dependency {
    Required(Vec<String>),
    Schema(NodeId),
}

#[derive(Debug)]
pub(crate) enum Rule {
    Type {
        types: Vec<PrimitiveType>,
        integer_accepts_float: bool,
    },
    /// Always holds an array
    Enum(Value),
    Const(Value),
    Minimum {
        limit: Number,
        exclusive: bool,
        keyword: &'static str,
    },
    Maximum {
        limit: Number,
        exclusive: bool,
        keyword: &'static str,
    },
    MultipleOf(Number),
    MinLength(u64),
    MaxLength(u64),
    Pattern {
        regex: Regex,
        source: String,
    },
    Format {
        format: Format,
        name: String,
    },
    Content {
        encoding: Option<ContentEncoding>,
        media_type: Option<MediaType>,
    },
    MinItems(u64),
    MaxItems(u64),
    UniqueItems,
    Items(ItemsRule),
    Contains {
        node: NodeId,
        min: u64,
        max: Option<u64>,
        /// 2020-12: matched indices count as evaluated items
        annotates_items: bool,
    },
    Required(Vec<String>),
    MinProperties(u64),
    MaxProperties(u64),
    Properties(PropertiesRule),
    PropertyNames(NodeId),
    Dependencies {
        keyword: &'static str,
        entries: Vec<(String, Dependency)>,
    },
    AllOf(Vec<NodeId>),
    AnyOf(Vec<NodeId>),
    OneOf(Vec<NodeId>),
    Not {
        node: NodeId,
        schema: Value,
    },
    Conditional {
        if_node: NodeId,
        then_node: Option<NodeId>,
        else_node: Option<NodeId>,
    },
    Ref(NodeId),
    /// `anchor` is set when the static target carries a matching
    /// `$dynamicAnchor`; otherwise the reference behaves like `$ref`
    DynamicRef {
        target: NodeId,
        anchor: Option<String>,
    },
    /// `dynamic` is set when the static target has `$recursiveAnchor: true`
    RecursiveRef {
        target: NodeId,
        dynamic: bool,
    },
    UnevaluatedProperties(NodeId),
    UnevaluatedItems(NodeId),
}

impl Rule {
    /// Schema path segment pushed around the rule.
    ///
    /// Grouped rules spanning several keywords return `None` and push
    /// their own segments.
    pub fn keyword(&self) -> Option<&'static str> {
        let keyword = match self {
            Rule::Type { .. } => "type",
            Rule::Enum(_) => "enum",
            Rule::Const(_) => "const",
            Rule::Minimum { keyword, .. } | Rule::Maximum { keyword, .. } => *keyword,
            Rule::MultipleOf(_) => "multipleOf",
            Rule::MinLength(_) => "minLength",
            Rule::MaxLength(_) => "maxLength",
            Rule::Pattern { .. } => "pattern",
            Rule::Format { .. } => "format",
            Rule::MinItems(_) => "minItems",
            Rule::MaxItems(_) => "maxItems",
            Rule::UniqueItems => "uniqueItems",
            Rule::Required(_) => "required",
            Rule::MinProperties(_) => "minProperties",
            Rule::MaxProperties(_) => "maxProperties",
            Rule::PropertyNames(_) => "propertyNames",
            Rule::Dependencies { keyword, .. } => *keyword,
            Rule::AllOf(_) => "allOf",
            Rule::AnyOf(_) => "anyOf",
            Rule::OneOf(_) => "oneOf",
            Rule::Not { .. } => "not",
            Rule::Ref(_) => "$ref",
            Rule::DynamicRef { .. } => "$dynamicRef",
            Rule::RecursiveRef { .. } => "$recursiveRef",
            Rule::UnevaluatedProperties(_) => "unevaluatedProperties",
            Rule::UnevaluatedItems(_) => "unevaluatedItems",
            Rule::Content { .. }
            | Rule::Items(_)
            | Rule::Contains { .. }
            | Rule::Properties(_)
            | Rule::Conditional { .. } => return None,
        };
        Some(keyword)
    }

    /// Subschemas applied to the same instance location as the rule.
    ///
    /// A cycle through these edges never terminates, so the compiler
    /// rejects it.
    pub fn in_place_children(&self, resources: &[ResourceScope], out: &mut Vec<NodeId>) {
        match self {
            Rule::AllOf(nodes) | Rule::AnyOf(nodes) | Rule::OneOf(nodes) => {
                out.extend(nodes.iter().copied())
            }
            Rule::Not { node, .. } | Rule::Ref(node) => out.push(*node),
            Rule::Conditional {
                if_node,
                then_node,
                else_node,
            } => {
                out.push(*if_node);
                out.extend(then_node.iter().chain(else_node.iter()).copied());
            }
            Rule::Dependencies { entries, .. } => {
                out.extend(entries.iter().filter_map(|(_, dep)| match dep {
                    Dependency::Schema(node) => Some(*node),
                    Dependency::Required(_) => None,
                }))
            }
            Rule::DynamicRef { target, anchor } => {
                out.push(*target);
                if let Some(name) = anchor {
                    out.extend(
                        resources
                            .iter()
                            .filter_map(|scope| scope.dynamic_anchors.get(name).copied()),
                    );
                }
            }
            Rule::RecursiveRef { target, dynamic } => {
                out.push(*target);
                if *dynamic {
                    out.extend(resources.iter().filter_map(|scope| scope.recursive_anchor));
                }
            }
            _ => {}
        }
    }
}

/// Per-resource data needed to resolve dynamic references at
/// validation time.
#[derive(Debug, Default)]
pub(crate) struct ResourceScope {
    pub dynamic_anchors: HashMap<String, NodeId>,
    /// Root node, when the resource has `$recursiveAnchor: true`
    pub recursive_anchor: Option<NodeId>,
}
