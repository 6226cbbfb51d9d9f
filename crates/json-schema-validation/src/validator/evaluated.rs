//! Evaluated locations for `unevaluatedProperties` and `unevaluatedItems`
//!
//! A property or item counts as evaluated when a keyword applied to it
//! at the current node, or in an in-place subschema that the instance
//! passes: `allOf`, passing `anyOf`/`oneOf` branches, the taken side of
//! `if`/`then`/`else`, dependent schemas and references.

use super::ValidationContext;
use crate::schema::types::{Dependency, NodeBody, NodeId, Rule};
use json_schema_value::Value;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub(super) struct Evaluated {
    keys: HashSet<String>,
    indices: Vec<bool>,
}

impl Evaluated {
    fn for_instance(instance: &Value) -> Self {
        let indices = match instance {
            Value::Array(items) => vec![false; items.len()],
            _ => Vec::new(),
        };
        Evaluated {
            keys: HashSet::new(),
            indices,
        }
    }

    pub(super) fn has_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub(super) fn has_index(&self, index: usize) -> bool {
        self.indices.get(index).copied().unwrap_or(false)
    }

    fn mark_index(&mut self, index: usize) {
        if let Some(slot) = self.indices.get_mut(index) {
            *slot = true;
        }
    }

    fn mark_all(&mut self, instance: &Value) {
        match instance {
            Value::Object(map) => self.keys.extend(map.keys().cloned()),
            Value::Array(_) => self.indices.iter_mut().for_each(|slot| *slot = true),
            _ => {}
        }
    }
}

impl ValidationContext<'_> {
    /// Locations of `instance` evaluated by node `id`, excluding the
    /// `unevaluated*` keywords of `id` itself.
    pub(super) fn evaluated(&mut self, id: NodeId, instance: &Value) -> Evaluated {
        let mut evaluated = Evaluated::for_instance(instance);
        self.collect_evaluated(id, instance, &mut evaluated, true);
        evaluated
    }

    fn collect_evaluated(
        &mut self,
        id: NodeId,
        instance: &Value,
        out: &mut Evaluated,
        top: bool,
    ) {
        let schema = self.schema;
        let node = schema.node(id);
        let NodeBody::Rules(rules) = &node.body else {
            return;
        };
        let entered = self.enter_resource(node.resource);

        for rule in rules {
            match rule {
                Rule::Properties(properties) => {
                    if let Value::Object(map) = instance {
                        if properties.additional.is_some() {
                            out.mark_all(instance);
                        } else {
                            let matched = map.keys().filter(|key| properties.matches_key(key));
                            out.keys.extend(matched.cloned());
                        }
                    }
                }
                Rule::Items(items) if instance.is_array() => {
                    if items.rest.is_some() {
                        out.mark_all(instance);
                    } else {
                        (0..items.prefix.len()).for_each(|index| out.mark_index(index));
                    }
                }
                Rule::Contains {
                    node,
                    annotates_items: true,
                    ..
                } => {
                    if let Value::Array(items) = instance {
                        for (index, item) in items.iter().enumerate() {
                            if self.passes(|ctx| ctx.validate_node(*node, item)) {
                                out.mark_index(index);
                            }
                        }
                    }
                }
                Rule::UnevaluatedProperties(_) if !top && instance.is_object() => {
                    out.mark_all(instance);
                }
                Rule::UnevaluatedItems(_) if !top && instance.is_array() => {
                    out.mark_all(instance);
                }
                Rule::AllOf(nodes) => {
                    for node in nodes {
                        self.collect_evaluated(*node, instance, out, false);
                    }
                }
                Rule::AnyOf(nodes) | Rule::OneOf(nodes) => {
                    for node in nodes {
                        if self.passes(|ctx| ctx.validate_node(*node, instance)) {
                            self.collect_evaluated(*node, instance, out, false);
                        }
                    }
                }
                Rule::Conditional {
                    if_node,
                    then_node,
                    else_node,
                } => {
                    if self.passes(|ctx| ctx.validate_node(*if_node, instance)) {
                        self.collect_evaluated(*if_node, instance, out, false);
                        if let Some(node) = then_node {
                            self.collect_evaluated(*node, instance, out, false);
                        }
                    } else if let Some(node) = else_node {
                        self.collect_evaluated(*node, instance, out, false);
                    }
                }
                Rule::Dependencies { entries, .. } => {
                    if let Value::Object(map) = instance {
                        for (name, dependency) in entries {
                            if let Dependency::Schema(node) = dependency
                                && map.contains_key(name)
                            {
                                self.collect_evaluated(*node, instance, out, false);
                            }
                        }
                    }
                }
                Rule::Ref(target) => self.collect_evaluated(*target, instance, out, false),
                Rule::DynamicRef { target, anchor } => {
                    let target = self.dynamic_target(*target, anchor.as_deref());
                    self.collect_evaluated(target, instance, out, false);
                }
                Rule::RecursiveRef { target, dynamic } => {
                    let target = self.recursive_target(*target, *dynamic);
                    self.collect_evaluated(target, instance, out, false);
                }
                _ => {}
            }
        }

        if entered {
            self.dynamic_scope.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_schema_value::parse;

    #[test]
    fn test_marks_are_bounded_by_the_instance() {
        let instance = parse("[1, 2]").unwrap();
        let mut evaluated = Evaluated::for_instance(&instance);
        evaluated.mark_index(5);
        evaluated.mark_index(1);
        assert!(!evaluated.has_index(0));
        assert!(evaluated.has_index(1));
        assert!(!evaluated.has_index(5));
    }

    #[test]
    fn test_mark_all_keys() {
        let instance = parse(r#"{"a": 1, "b": 2}"#).unwrap();
        let mut evaluated = Evaluated::for_instance(&instance);
        evaluated.mark_all(&instance);
        assert!(evaluated.has_key("a"));
        assert!(evaluated.has_key("b"));
        assert!(!evaluated.has_key("c"));
    }
}
