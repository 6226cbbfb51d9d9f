// Arena compiler: schema locations to schema nodes

use super::CompiledSchema;
use super::cycles::find_in_place_cycle;
use super::parsers::parse_rules;
use super::types::{NodeBody, NodeId, ResourceScope, SchemaNode};
use crate::draft::DraftSpec;
use crate::error::{SchemaError, SchemaResult};
use crate::options::ValidatorOptions;
use crate::resolver::{Location, ResolutionContext, Scope};
use json_schema_value::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// A schema object being compiled, together with what is in effect at
/// its location.
pub(in crate::schema) struct Site<'a> {
    pub map: &'a Map,
    pub location: Location,
    pub scope: Scope,
}

impl<'a> Site<'a> {
    pub fn spec(&self) -> &'static DraftSpec {
        self.scope.draft.spec()
    }

    pub fn get(&self, keyword: &str) -> Option<&'a Value> {
        self.map.get(keyword)
    }

    /// Location of a keyword value inside this schema object
    pub fn at(&self, keyword: &str) -> Location {
        self.location.child(keyword)
    }
}

pub(in crate::schema) struct Compiler<'r, 'a> {
    resolver: &'r ResolutionContext<'a>,
    pub options: ValidatorOptions,
    /// `None` while a node's body is being compiled
    nodes: Vec<Option<SchemaNode>>,
    locations: Vec<Location>,
    memo: HashMap<Location, NodeId>,
    resources: Vec<ResourceScope>,
    dynamic_names: HashSet<String>,
    recursive_compiled: bool,
}

impl<'r, 'a> Compiler<'r, 'a> {
    pub fn new(resolver: &'r ResolutionContext<'a>, options: ValidatorOptions) -> Self {
        let resources = resolver
            .resources()
            .iter()
            .map(|_| ResourceScope::default())
            .collect();
        Self {
            resolver,
            options,
            nodes: Vec::new(),
            locations: Vec::new(),
            memo: HashMap::new(),
            resources,
            dynamic_names: HashSet::new(),
            recursive_compiled: false,
        }
    }

    /// Compile the root document and everything reachable from it.
    pub fn finish(mut self) -> SchemaResult<CompiledSchema> {
        let root = self.compile_location(&Location::root(0))?;

        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (index, node) in self.nodes.into_iter().enumerate() {
            let node = node.ok_or_else(|| SchemaError::InvalidStructure {
                message: "subschema was never compiled".to_string(),
                location: self.resolver.describe(&self.locations[index]),
            })?;
            nodes.push(node);
        }

        if let Some(NodeId(index)) = find_in_place_cycle(&nodes, &self.resources) {
            return Err(SchemaError::CyclicReference {
                location: self.resolver.describe(&self.locations[index]),
            });
        }

        Ok(CompiledSchema::from_parts(
            nodes,
            root,
            self.resources,
            self.options,
        ))
    }

    pub fn compile_location(&mut self, location: &Location) -> SchemaResult<NodeId> {
        self.compile_at(location, false)
    }

    /// Draft 4 accepts booleans for `additionalProperties` and
    /// `additionalItems` only; those call sites compile through here.
    pub fn compile_allowing_boolean(&mut self, location: &Location) -> SchemaResult<NodeId> {
        self.compile_at(location, true)
    }

    fn compile_at(&mut self, location: &Location, boolean_allowed: bool) -> SchemaResult<NodeId> {
        if let Some(id) = self.memo.get(location) {
            return Ok(*id);
        }
        let resolver = self.resolver;
        let value = resolver
            .value_at(location)
            .ok_or_else(|| SchemaError::UnresolvedReference {
                reference: format!("#{}", location.pointer),
                location: resolver.describe(location),
            })?;
        let scope = resolver
            .scope_of(location)
            .cloned()
            .ok_or_else(|| self.invalid(location, "subschema is outside every resource"))?;

        let id = NodeId(self.nodes.len());
        self.nodes.push(None);
        self.locations.push(location.clone());
        self.memo.insert(location.clone(), id);
        trace!(location = %resolver.describe(location), node = id.0, "compiling subschema");

        let resource = scope.resource;
        let body = match value {
            Value::Bool(b) => {
                if !scope.draft.spec().boolean_schemas && !boolean_allowed {
                    return Err(SchemaError::UnsupportedBooleanSchema {
                        location: resolver.describe(location),
                    });
                }
                NodeBody::Bool(*b)
            }
            Value::Object(map) => {
                let site = Site {
                    map,
                    location: location.clone(),
                    scope,
                };
                NodeBody::Rules(parse_rules(self, &site)?)
            }
            other => {
                return Err(self.invalid(
                    location,
                    format!(
                        "a schema must be an object or a boolean, found {}",
                        other.type_name()
                    ),
                ));
            }
        };
        self.nodes[id.0] = Some(SchemaNode { resource, body });
        Ok(id)
    }

    /// Resolve a reference keyword of `site` and compile its target.
    pub fn compile_reference(
        &mut self,
        site: &Site<'_>,
        keyword: &str,
        reference: &str,
    ) -> SchemaResult<(Location, NodeId)> {
        let target = self
            .resolver
            .resolve(&site.scope.base, reference, &site.at(keyword))?;
        let node = self.compile_location(&target)?;
        Ok((target, node))
    }

    /// Compile every `$dynamicAnchor` named `name`, across all resources,
    /// so they can be selected at validation time.
    pub fn compile_dynamic_anchors(&mut self, name: &str) -> SchemaResult<()> {
        if !self.dynamic_names.insert(name.to_string()) {
            return Ok(());
        }
        let resolver = self.resolver;
        for (index, resource) in resolver.resources().iter().enumerate() {
            if let Some(location) = resource.dynamic_anchors.get(name) {
                let node = self.compile_location(location)?;
                self.resources[index]
                    .dynamic_anchors
                    .insert(name.to_string(), node);
            }
        }
        Ok(())
    }

    /// Compile the root of every resource with `$recursiveAnchor: true`.
    pub fn compile_recursive_anchors(&mut self) -> SchemaResult<()> {
        if self.recursive_compiled {
            return Ok(());
        }
        self.recursive_compiled = true;
        let resolver = self.resolver;
        for (index, resource) in resolver.resources().iter().enumerate() {
            if resource.recursive_anchor {
                let node = self.compile_location(&resource.root)?;
                self.resources[index].recursive_anchor = Some(node);
            }
        }
        Ok(())
    }

    pub fn resolver(&self) -> &'r ResolutionContext<'a> {
        self.resolver
    }

    /// An `InvalidStructure` error positioned at `location`
    pub fn invalid(&self, location: &Location, message: impl Into<String>) -> SchemaError {
        SchemaError::InvalidStructure {
            message: message.into(),
            location: self.resolver.describe(location),
        }
    }
}
