//! Scalar keyword parsers
//!
//! `type`, `enum`, the numeric limits, `multipleOf`, `pattern`, `format`
//! and the draft 6/7 content keywords.

use crate::content::{ContentEncoding, MediaType};
use crate::error::{SchemaError, SchemaResult};
use crate::format::Format;
use crate::schema::compiler::{Compiler, Site};
use crate::schema::helpers::{compile_regex, get_bool, get_number, get_string};
use crate::schema::types::{PrimitiveType, Rule};
use json_schema_value::Value;

/// `type`: a type name or a non-empty array of unique type names
pub(in crate::schema) fn parse_type(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Rule> {
    let names: Vec<&Value> = match value {
        Value::String(_) => vec![value],
        Value::Array(items) if !items.is_empty() => items.iter().collect(),
        _ => {
            return Err(c.invalid(
                &site.at("type"),
                "'type' must be a type name or a non-empty array of type names",
            ));
        }
    };

    let mut types = Vec::with_capacity(names.len());
    for (index, name) in names.into_iter().enumerate() {
        let location = if value.is_array() {
            site.at("type").child_index(index)
        } else {
            site.at("type")
        };
        let Some(name) = name.as_str() else {
            return Err(c.invalid(&location, "type names must be strings"));
        };
        let ty = PrimitiveType::from_name(name).ok_or_else(|| SchemaError::InvalidType {
            name: name.to_string(),
            location: c.resolver().describe(&location),
        })?;
        if types.contains(&ty) {
            return Err(c.invalid(&location, format!("duplicate type name '{}'", name)));
        }
        types.push(ty);
    }

    Ok(Rule::Type {
        types,
        integer_accepts_float: site.spec().integer_accepts_float,
    })
}

pub(in crate::schema) fn parse_enum(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Rule> {
    if !value.is_array() {
        return Err(c.invalid(&site.at("enum"), "'enum' must be an array"));
    }
    Ok(Rule::Enum(value.clone()))
}

/// `minimum`, `maximum`, `exclusiveMinimum` and `exclusiveMaximum`.
///
/// In draft 4 the exclusive keywords are booleans folded into
/// `minimum`/`maximum` and produce no rule of their own.
pub(in crate::schema) fn parse_limit(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    keyword: &str,
    value: &Value,
) -> SchemaResult<Option<Rule>> {
    if site.spec().boolean_exclusive_limits {
        return match keyword {
            "minimum" | "maximum" => {
                let limit = get_number(c, site, keyword, value)?;
                let modifier = if keyword == "minimum" {
                    "exclusiveMinimum"
                } else {
                    "exclusiveMaximum"
                };
                let exclusive = match site.get(modifier) {
                    Some(flag) => get_bool(c, site, modifier, flag)?,
                    None => false,
                };
                Ok(Some(if keyword == "minimum" {
                    Rule::Minimum {
                        limit,
                        exclusive,
                        keyword: "minimum",
                    }
                } else {
                    Rule::Maximum {
                        limit,
                        exclusive,
                        keyword: "maximum",
                    }
                }))
            }
            _ => {
                get_bool(c, site, keyword, value)?;
                Ok(None)
            }
        };
    }

    let limit = get_number(c, site, keyword, value)?;
    let rule = match keyword {
        "minimum" => Rule::Minimum {
            limit,
            exclusive: false,
            keyword: "minimum",
        },
        "exclusiveMinimum" => Rule::Minimum {
            limit,
            exclusive: true,
            keyword: "exclusiveMinimum",
        },
        "maximum" => Rule::Maximum {
            limit,
            exclusive: false,
            keyword: "maximum",
        },
        _ => Rule::Maximum {
            limit,
            exclusive: true,
            keyword: "exclusiveMaximum",
        },
    };
    Ok(Some(rule))
}

pub(in crate::schema) fn parse_multiple_of(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Rule> {
    let divisor = get_number(c, site, "multipleOf", value)?;
    if !divisor.is_positive() {
        return Err(c.invalid(
            &site.at("multipleOf"),
            "'multipleOf' must be strictly positive",
        ));
    }
    Ok(Rule::MultipleOf(divisor))
}

pub(in crate::schema) fn parse_pattern(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Rule> {
    let source = get_string(c, site, "pattern", value)?;
    let regex = compile_regex(c, site, "pattern", source)?;
    Ok(Rule::Pattern {
        regex,
        source: source.to_string(),
    })
}

/// `format` must be a string; it asserts only when format validation is
/// enabled and the format is known.
pub(in crate::schema) fn parse_format(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Option<Rule>> {
    let name = get_string(c, site, "format", value)?;
    if !c.options.validate_formats {
        return Ok(None);
    }
    Ok(Format::from_name(name).map(|format| Rule::Format {
        format,
        name: name.to_string(),
    }))
}

/// `contentEncoding` and `contentMediaType`, asserting in draft 6/7 when
/// format validation is enabled. Unknown encodings and media types are
/// ignored.
pub(in crate::schema) fn parse_content(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
) -> SchemaResult<Option<Rule>> {
    let encoding = match site.get("contentEncoding") {
        Some(value) => Some(get_string(c, site, "contentEncoding", value)?),
        None => None,
    };
    let media_type = match site.get("contentMediaType") {
        Some(value) => Some(get_string(c, site, "contentMediaType", value)?),
        None => None,
    };
    if !site.spec().content_assertions || !c.options.validate_formats {
        return Ok(None);
    }

    let encoding = encoding.and_then(ContentEncoding::from_name);
    let media_type = media_type.and_then(MediaType::from_name);
    if encoding.is_none() && media_type.is_none() {
        return Ok(None);
    }
    Ok(Some(Rule::Content {
        encoding,
        media_type,
    }))
}
