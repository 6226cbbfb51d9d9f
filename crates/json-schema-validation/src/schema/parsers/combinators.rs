//! Combinator parsers: allOf, anyOf, oneOf, not and if/then/else

use crate::error::SchemaResult;
use crate::schema::compiler::{Compiler, Site};
use crate::schema::helpers::get_schema_array;
use crate::schema::types::Rule;
use json_schema_value::Value;

pub(in crate::schema) fn parse_of(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
    keyword: &str,
    value: &Value,
) -> SchemaResult<Rule> {
    let nodes = get_schema_array(c, site, keyword, value)?;
    Ok(match keyword {
        "allOf" => Rule::AllOf(nodes),
        "anyOf" => Rule::AnyOf(nodes),
        _ => Rule::OneOf(nodes),
    })
}

pub(in crate::schema) fn parse_not(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Rule> {
    let node = c.compile_location(&site.at("not"))?;
    Ok(Rule::Not {
        node,
        schema: value.clone(),
    })
}

/// `if` with `then`/`else`. Without either branch `if` has no effect
/// and is not compiled into a rule.
pub(in crate::schema) fn parse_conditional(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
) -> SchemaResult<Option<Rule>> {
    if site.get("then").is_none() && site.get("else").is_none() {
        return Ok(None);
    }
    let if_node = c.compile_location(&site.at("if"))?;
    let then_node = match site.get("then") {
        Some(_) => Some(c.compile_location(&site.at("then"))?),
        None => None,
    };
    let else_node = match site.get("else") {
        Some(_) => Some(c.compile_location(&site.at("else"))?),
        None => None,
    };
    Ok(Some(Rule::Conditional {
        if_node,
        then_node,
        else_node,
    }))
}
