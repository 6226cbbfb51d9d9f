//! Reference parsers
//!
//! `$ref` is resolved statically. `$dynamicRef` (2020-12) and
//! `$recursiveRef` (2019-09) are resolved statically too, and also record
//! every candidate they may be redirected to through the dynamic scope.

use crate::error::SchemaResult;
use crate::schema::compiler::{Compiler, Site};
use crate::schema::helpers::get_string;
use crate::schema::types::Rule;
use json_schema_value::Value;

pub(in crate::schema) fn parse_ref(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Rule> {
    let reference = get_string(c, site, "$ref", value)?;
    let (_, target) = c.compile_reference(site, "$ref", reference)?;
    Ok(Rule::Ref(target))
}

pub(in crate::schema) fn parse_dynamic_ref(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Rule> {
    let reference = get_string(c, site, "$dynamicRef", value)?;
    let (location, target) = c.compile_reference(site, "$dynamicRef", reference)?;

    // Only a plain-name fragment whose static target is itself a
    // `$dynamicAnchor` of that name is looked up dynamically
    let anchor = reference
        .rsplit_once('#')
        .map(|(_, fragment)| fragment)
        .filter(|fragment| !fragment.is_empty() && !fragment.starts_with('/'))
        .filter(|name| c.resolver().is_dynamic_anchor(&location, name))
        .map(str::to_string);
    if let Some(name) = &anchor {
        c.compile_dynamic_anchors(name)?;
    }
    Ok(Rule::DynamicRef { target, anchor })
}

pub(in crate::schema) fn parse_recursive_ref(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Rule> {
    let reference = get_string(c, site, "$recursiveRef", value)?;
    let (location, target) = c.compile_reference(site, "$recursiveRef", reference)?;
    let dynamic = c.resolver().is_recursive_anchor(&location);
    if dynamic {
        c.compile_recursive_anchors()?;
    }
    Ok(Rule::RecursiveRef { target, dynamic })
}
