//! Object keyword parsers

use crate::error::SchemaResult;
use crate::schema::compiler::{Compiler, Site};
use crate::schema::helpers::{compile_regex, get_schema_map, get_string_array};
use crate::schema::types::{Dependency, PropertiesRule, Rule};
use json_schema_value::Value;

/// `properties`, `patternProperties` and `additionalProperties` as one rule
pub(in crate::schema) fn parse_properties(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
) -> SchemaResult<Option<Rule>> {
    let properties = match site.get("properties") {
        Some(value) => get_schema_map(c, site, "properties", value)?,
        None => Vec::new(),
    };

    let mut patterns = Vec::new();
    if let Some(value) = site.get("patternProperties") {
        let entries = value.as_object().ok_or_else(|| {
            c.invalid(
                &site.at("patternProperties"),
                "'patternProperties' must be an object",
            )
        })?;
        let location = site.at("patternProperties");
        for pattern in entries.keys() {
            let regex = compile_regex(c, site, "patternProperties", pattern)?;
            let node = c.compile_location(&location.child(pattern))?;
            patterns.push((regex, pattern.clone(), node));
        }
    }

    let additional = match site.get("additionalProperties") {
        Some(_) => Some(c.compile_allowing_boolean(&site.at("additionalProperties"))?),
        None => None,
    };

    if properties.is_empty() && patterns.is_empty() && additional.is_none() {
        return Ok(None);
    }
    Ok(Some(Rule::Properties(PropertiesRule {
        properties,
        patterns,
        additional,
    })))
}

pub(in crate::schema) fn parse_required(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Rule> {
    Ok(Rule::Required(get_string_array(c, site, "required", value)?))
}

/// Legacy `dependencies`: each value is a property-name array or a schema
pub(in crate::schema) fn parse_dependencies(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Rule> {
    let entries = value
        .as_object()
        .ok_or_else(|| c.invalid(&site.at("dependencies"), "'dependencies' must be an object"))?;
    let location = site.at("dependencies");
    let mut deps = Vec::with_capacity(entries.len());
    for (name, dependency) in entries {
        let dependency = match dependency {
            Value::Array(_) => {
                let keyword_site = Site {
                    map: entries,
                    location: location.clone(),
                    scope: site.scope.clone(),
                };
                Dependency::Required(get_string_array(c, &keyword_site, name, dependency)?)
            }
            _ => Dependency::Schema(c.compile_location(&location.child(name))?),
        };
        deps.push((name.clone(), dependency));
    }
    Ok(Rule::Dependencies {
        keyword: "dependencies",
        entries: deps,
    })
}

pub(in crate::schema) fn parse_dependent_required(
    c: &Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Rule> {
    let entries = value.as_object().ok_or_else(|| {
        c.invalid(
            &site.at("dependentRequired"),
            "'dependentRequired' must be an object",
        )
    })?;
    let keyword_site = Site {
        map: entries,
        location: site.at("dependentRequired"),
        scope: site.scope.clone(),
    };
    let mut deps = Vec::with_capacity(entries.len());
    for (name, names) in entries {
        deps.push((
            name.clone(),
            Dependency::Required(get_string_array(c, &keyword_site, name, names)?),
        ));
    }
    Ok(Rule::Dependencies {
        keyword: "dependentRequired",
        entries: deps,
    })
}

pub(in crate::schema) fn parse_dependent_schemas(
    c: &mut Compiler<'_, '_>,
    site: &Site<'_>,
    value: &Value,
) -> SchemaResult<Rule> {
    let entries = get_schema_map(c, site, "dependentSchemas", value)?
        .into_iter()
        .map(|(name, node)| (name, Dependency::Schema(node)))
        .collect();
    Ok(Rule::Dependencies {
        keyword: "dependentSchemas",
        entries,
    })
}
