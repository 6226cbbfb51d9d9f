//! Schema compilation
//!
//! A schema document is compiled once into a [`CompiledSchema`]: every
//! subschema becomes a node in an arena, keyword values are checked and
//! pre-processed (regexes compiled, references resolved to node ids),
//! and the result is immutable and shareable across threads.

mod compiler;
mod cycles;
mod helpers;
mod parsers;
pub(crate) mod types;

use crate::draft::Draft;
use crate::error::SchemaResult;
use crate::options::ValidatorOptions;
use crate::resolver::ResolutionContext;
use compiler::Compiler;
use json_schema_value::Value;
use tracing::debug;
use types::{NodeBody, NodeId, ResourceScope, SchemaNode};

/// An immutable, compiled schema.
#[derive(Debug)]
pub struct CompiledSchema {
    pub(crate) nodes: Vec<SchemaNode>,
    pub(crate) root: NodeId,
    pub(crate) resources: Vec<ResourceScope>,
    options: ValidatorOptions,
}

impl CompiledSchema {
    fn from_parts(
        nodes: Vec<SchemaNode>,
        root: NodeId,
        resources: Vec<ResourceScope>,
        options: ValidatorOptions,
    ) -> Self {
        Self {
            nodes,
            root,
            resources,
            options,
        }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Draft of the root schema
    pub fn draft(&self) -> Draft {
        self.options.draft
    }

    /// Number of distinct subschemas reachable from the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    pub(crate) fn is_false(&self, id: NodeId) -> bool {
        matches!(self.node(id).body, NodeBody::Bool(false))
    }
}

/// Compile a parsed schema document.
///
/// # Errors
///
/// Returns a [`SchemaError`](crate::SchemaError) for malformed keyword
/// values, invalid regexes, unresolvable references and reference
/// cycles that never descend into the instance.
pub fn compile(schema: &Value, options: ValidatorOptions) -> SchemaResult<CompiledSchema> {
    let resolver = ResolutionContext::build(schema, options.draft, options.with_meta_schemas)?;
    let compiled = Compiler::new(&resolver, options).finish()?;
    debug!(
        draft = %options.draft,
        nodes = compiled.nodes.len(),
        resources = compiled.resources.len(),
        "compiled schema"
    );
    Ok(compiled)
}
