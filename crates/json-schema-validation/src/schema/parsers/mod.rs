//! Keyword parsers
//!
//! One module per keyword family:
//! - primitive: type, enum, const, numeric and string constraints, format, content
//! - arrays: items, contains and the array size/uniqueness keywords
//! - objects: properties, required, dependencies and the object size keywords
//! - combinators: allOf, anyOf, oneOf, not, if/then/else
//! - ref: $ref, $dynamicRef, $recursiveRef

pub(super) mod arrays;
pub(super) mod combinators;
pub(super) mod objects;
pub(super) mod primitive;
pub(super) mod r#ref;

use super::compiler::{Compiler, Site};
use super::helpers::get_non_negative;
use super::types::Rule;
use crate::error::SchemaResult;

/// Keywords parsed as one rule, at the position of the first member seen
#[derive(Default)]
struct Groups {
    properties: bool,
    items: bool,
    contains: bool,
    content: bool,
}

/// Compile the keywords of one schema object into rules, in document
/// order. Keywords the draft does not define are annotations and are
/// skipped.
pub(in crate::schema) fn parse_rules(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
) -> SchemaResult<Vec<Rule>> {
    let spec = site.spec();
    if spec.ref_overrides_siblings
        && let Some(reference) = site.get("$ref")
    {
        return Ok(vec![r#ref::parse_ref(c, site, reference)?]);
    }

    let mut groups = Groups::default();
    let mut rules = Vec::new();
    for (keyword, value) in site.map {
        if !spec.recognizes(keyword) {
            continue;
        }
        let rule = match keyword.as_str() {
            "type" => Some(primitive::parse_type(c, site, value)?),
            "enum" => Some(primitive::parse_enum(c, site, value)?),
            "const" => Some(Rule::Const(value.clone())),
            "minimum" | "maximum" | "exclusiveMinimum" | "exclusiveMaximum" => {
                primitive::parse_limit(c, site, keyword, value)?
            }
            "multipleOf" => Some(primitive::parse_multiple_of(c, site, value)?),
            "minLength" => Some(Rule::MinLength(get_non_negative(c, site, keyword, value)?)),
            "maxLength" => Some(Rule::MaxLength(get_non_negative(c, site, keyword, value)?)),
            "pattern" => Some(primitive::parse_pattern(c, site, value)?),
            "format" => primitive::parse_format(c, site, value)?,
            "contentEncoding" | "contentMediaType" => {
                if std::mem::replace(&mut groups.content, true) {
                    None
                } else {
                    primitive::parse_content(c, site)?
                }
            }
            "items" | "additionalItems" | "prefixItems" => {
                if std::mem::replace(&mut groups.items, true) {
                    None
                } else {
                    arrays::parse_items(c, site)?
                }
            }
            "contains" | "minContains" | "maxContains" => {
                if std::mem::replace(&mut groups.contains, true) {
                    None
                } else {
                    arrays::parse_contains(c, site)?
                }
            }
            "minItems" => Some(Rule::MinItems(get_non_negative(c, site, keyword, value)?)),
            "maxItems" => Some(Rule::MaxItems(get_non_negative(c, site, keyword, value)?)),
            "uniqueItems" => arrays::parse_unique_items(c, site, value)?,
            "unevaluatedItems" => Some(Rule::UnevaluatedItems(
                c.compile_location(&site.at(keyword))?,
            )),
            "properties" | "patternProperties" | "additionalProperties" => {
                if std::mem::replace(&mut groups.properties, true) {
                    None
                } else {
                    objects::parse_properties(c, site)?
                }
            }
            "required" => Some(objects::parse_required(c, site, value)?),
            "minProperties" => Some(Rule::MinProperties(get_non_negative(
                c, site, keyword, value,
            )?)),
            "maxProperties" => Some(Rule::MaxProperties(get_non_negative(
                c, site, keyword, value,
            )?)),
            "propertyNames" => Some(Rule::PropertyNames(c.compile_location(&site.at(keyword))?)),
            "dependencies" => Some(objects::parse_dependencies(c, site, value)?),
            "dependentRequired" => Some(objects::parse_dependent_required(c, site, value)?),
            "dependentSchemas" => Some(objects::parse_dependent_schemas(c, site, value)?),
            "unevaluatedProperties" => Some(Rule::UnevaluatedProperties(
                c.compile_location(&site.at(keyword))?,
            )),
            "allOf" | "anyOf" | "oneOf" => Some(combinators::parse_of(c, site, keyword, value)?),
            "not" => Some(combinators::parse_not(c, site, value)?),
            "if" => combinators::parse_conditional(c, site)?,
            "$ref" => Some(r#ref::parse_ref(c, site, value)?),
            "$dynamicRef" => Some(r#ref::parse_dynamic_ref(c, site, value)?),
            "$recursiveRef" => Some(r#ref::parse_recursive_ref(c, site, value)?),
            // identifiers, annotations and keywords consumed by a group
            _ => None,
        };
        if let Some(rule) = rule {
            rules.push(rule);
        }
    }
    Ok(rules)
}
