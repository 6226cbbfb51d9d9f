//! Helper functions for reading keyword values
//!
//! Each helper checks the shape of one keyword value and reports a
//! `SchemaError` positioned at that keyword.

use super::compiler::{Compiler, Site};
use super::types::NodeId;
use crate::error::{SchemaError, SchemaResult};
use json_schema_value::{Number, Value};
use fancy_regex::Regex;

/// A non-negative integer; integral floats such as `2.0` are accepted
pub(super) fn get_non_negative(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    keyword: &str,
    value: &Value,
) -> SchemaResult<u64> {
    value.as_number().and_then(Number::as_u64).ok_or_else(|| {
        c.invalid(
            &site.at(keyword),
            format!("'{}' must be a non-negative integer", keyword),
        )
    })
}

pub(super) fn get_number(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    keyword: &str,
    value: &Value,
) -> SchemaResult<Number> {
    value
        .as_number()
        .cloned()
        .ok_or_else(|| c.invalid(&site.at(keyword), format!("'{}' must be a number", keyword)))
}

pub(super) fn get_bool(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    keyword: &str,
    value: &Value,
) -> SchemaResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| c.invalid(&site.at(keyword), format!("'{}' must be a boolean", keyword)))
}

pub(super) fn get_string<'v>(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    keyword: &str,
    value: &'v Value,
) -> SchemaResult<&'v str> {
    value
        .as_str()
        .ok_or_else(|| c.invalid(&site.at(keyword), format!("'{}' must be a string", keyword)))
}

/// An array of unique strings
pub(super) fn get_string_array(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    keyword: &str,
    value: &Value,
) -> SchemaResult<Vec<String>> {
    let error = || {
        c.invalid(
            &site.at(keyword),
            format!("'{}' must be an array of unique strings", keyword),
        )
    };
    let items = value.as_array().ok_or_else(error)?;
    let mut names: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let name = item.as_str().ok_or_else(error)?;
        if names.iter().any(|existing| existing == name) {
            return Err(error());
        }
        names.push(name.to_string());
    }
    Ok(names)
}

/// A non-empty array of schemas, compiled in order
pub(super) fn get_schema_array(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
    keyword: &str,
    value: &Value,
) -> SchemaResult<Vec<NodeId>> {
    let items = match value.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => {
            return Err(c.invalid(
                &site.at(keyword),
                format!("'{}' must be a non-empty array of schemas", keyword),
            ));
        }
    };
    let location = site.at(keyword);
    (0..items.len())
        .map(|index| c.compile_location(&location.child_index(index)))
        .collect()
}

/// An object whose values are schemas, compiled in document order
pub(super) fn get_schema_map(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
    keyword: &str,
    value: &Value,
) -> SchemaResult<Vec<(String, NodeId)>> {
    let entries = value.as_object().ok_or_else(|| {
        c.invalid(&site.at(keyword), format!("'{}' must be an object", keyword))
    })?;
    let location = site.at(keyword);
    entries
        .keys()
        .map(|name| Ok((name.clone(), c.compile_location(&location.child(name))?)))
        .collect()
}

/// Compile a pattern; `keyword` is reported as the position
pub(super) fn compile_regex(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    keyword: &str,
    pattern: &str,
) -> SchemaResult<Regex> {
    Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
        location: c.resolver().describe(&site.at(keyword)),
    })
}
