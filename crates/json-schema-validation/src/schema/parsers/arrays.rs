//! Array keyword parsers
//!
//! Positional item schemas are spelled differently across drafts:
//! - draft 4 to 2019-09: `items` (schema or array) + `additionalItems`
//! - 2020-12: `prefixItems` (array) + `items` (schema)

use crate::draft::ItemsStyle;
use crate::error::SchemaResult;
use crate::schema::compiler::{Compiler, Site};
use crate::schema::helpers::{get_bool, get_non_negative, get_schema_array};
use crate::schema::types::{ItemsRule, Rule};
use json_schema_value::Value;

pub(in crate::schema) fn parse_items(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
) -> SchemaResult<Option<Rule>> {
    let rule = match site.spec().items_style {
        ItemsStyle::ItemsArray => match site.get("items") {
            // additionalItems without positional items constrains nothing
            None => return Ok(None),
            Some(Value::Array(items)) => {
                let location = site.at("items");
                let mut prefix = Vec::with_capacity(items.len());
                for index in 0..items.len() {
                    prefix.push(c.compile_location(&location.child_index(index))?);
                }
                let rest = match site.get("additionalItems") {
                    Some(_) => Some(c.compile_allowing_boolean(&site.at("additionalItems"))?),
                    None => None,
                };
                ItemsRule {
                    prefix,
                    prefix_keyword: "items",
                    rest,
                    rest_keyword: "additionalItems",
                }
            }
            Some(_) => ItemsRule {
                prefix: Vec::new(),
                prefix_keyword: "items",
                rest: Some(c.compile_location(&site.at("items"))?),
                rest_keyword: "items",
            },
        },
        ItemsStyle::PrefixItems => {
            let prefix = match site.get("prefixItems") {
                Some(value) => get_schema_array(c, site, "prefixItems", value)?,
                None => Vec::new(),
            };
            let rest = match site.get("items") {
                Some(Value::Array(_)) => {
                    return Err(c.invalid(
                        &site.at("items"),
                        "'items' must be a schema; use 'prefixItems' for positional schemas",
                    ));
                }
                Some(_) => Some(c.compile_location(&site.at("items"))?),
                None => None,
            };
            if prefix.is_empty() && rest.is_none() {
                return Ok(None);
            }
            ItemsRule {
                prefix,
                prefix_keyword: "prefixItems",
                rest,
                rest_keyword: "items",
            }
        }
    };
    Ok(Some(Rule::Items(rule)))
}

/// `contains` with the optional `minContains`/`maxContains` bounds
pub(in crate::schema) fn parse_contains(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
) -> SchemaResult<Option<Rule>> {
    let min = get_contains_bound(c, site, "minContains")?;
    let max = get_contains_bound(c, site, "maxContains")?;
    if site.get("contains").is_none() {
        return Ok(None);
    }
    let node = c.compile_location(&site.at("contains"))?;
    Ok(Some(Rule::Contains {
        node,
        min: min.unwrap_or(1),
        max,
        annotates_items: site.spec().items_style == ItemsStyle::PrefixItems,
    }))
}

fn get_contains_bound(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    keyword: &str,
) -> SchemaResult<Option<u64>> {
    match site.get(keyword) {
        Some(value) if site.spec().recognizes(keyword) => {
            Ok(Some(get_non_negative(c, site, keyword, value)?))
        }
        _ => Ok(None),
    }
}

pub(in crate::schema) fn parse_unique_items(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Option<Rule>> {
    let unique = get_bool(c, site, "uniqueItems", value)?;
    Ok(unique.then_some(Rule::UniqueItems))
}
