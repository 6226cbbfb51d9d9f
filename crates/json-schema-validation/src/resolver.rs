//! Reference resolution.
//!
//! A [`ResolutionContext`] is built with one traversal per schema document.
//! The traversal records, for every subschema location, the base URI,
//! owning resource and draft in effect there. `$ref` values are then
//! resolved against that table without touching the network or the
//! filesystem.

use crate::draft::{AnchorStyle, Draft, DynamicRefStyle, SubschemaShape, meta_schemas};
use crate::error::{SchemaError, SchemaResult};
use json_schema_value::{Value, escape};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use tracing::trace;
use url::Url;

/// Base URI of a root schema that does not declare its own `$id`
pub const DEFAULT_BASE_URI: &str = "json-schema:///";

pub(crate) type DocumentId = usize;

/// A subschema position: a document plus an escaped JSON Pointer into it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Location {
    pub document: DocumentId,
    pub pointer: String,
}

impl Location {
    pub fn root(document: DocumentId) -> Self {
        Location {
            document,
            pointer: String::new(),
        }
    }

    pub fn child(&self, key: &str) -> Location {
        Location {
            document: self.document,
            pointer: format!("{}/{}", self.pointer, escape(key)),
        }
    }

    pub fn child_index(&self, index: usize) -> Location {
        Location {
            document: self.document,
            pointer: format!("{}/{}", self.pointer, index),
        }
    }

    fn parent(&self) -> Option<Location> {
        let (head, _) = self.pointer.rsplit_once('/')?;
        Some(Location {
            document: self.document,
            pointer: head.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ResourceId(pub usize);

/// A schema resource: the document root or a subschema with its own `$id`.
#[derive(Debug)]
pub(crate) struct Resource {
    pub uri: Url,
    pub root: Location,
    pub draft: Draft,
    pub anchors: HashMap<String, Location>,
    pub dynamic_anchors: HashMap<String, Location>,
    /// `$recursiveAnchor: true` at the resource root
    pub recursive_anchor: bool,
}

/// What is in effect at one subschema location.
#[derive(Debug, Clone)]
pub(crate) struct Scope {
    pub base: Url,
    pub resource: ResourceId,
    pub draft: Draft,
}

pub(crate) struct ResolutionContext<'a> {
    documents: Vec<&'a Value>,
    /// Display names for error locations; empty for the root document
    document_names: Vec<String>,
    resources: Vec<Resource>,
    by_uri: HashMap<String, ResourceId>,
    scopes: HashMap<Location, Scope>,
}

impl<'a> ResolutionContext<'a> {
    /// Traverse `root` (and the embedded meta-schemas, when requested).
    ///
    /// The root document is interpreted with `draft`; nested resources
    /// and meta-schema documents switch to the draft named by their
    /// `$schema`.
    pub fn build(root: &'a Value, draft: Draft, with_meta_schemas: bool) -> SchemaResult<Self> {
        let mut ctx = ResolutionContext {
            documents: Vec::new(),
            document_names: Vec::new(),
            resources: Vec::new(),
            by_uri: HashMap::new(),
            scopes: HashMap::new(),
        };
        ctx.add_document(root, String::new(), DEFAULT_BASE_URI, draft)?;
        if with_meta_schemas {
            for meta in meta_schemas() {
                ctx.add_document(&meta.value, meta.uri.to_string(), meta.uri, meta.draft)?;
            }
        }
        Ok(ctx)
    }

    fn add_document(
        &mut self,
        value: &'a Value,
        name: String,
        base: &str,
        draft: Draft,
    ) -> SchemaResult<()> {
        let document = self.documents.len();
        self.documents.push(value);
        self.document_names.push(name);
        let location = Location::root(document);
        let base = Url::parse(base).map_err(|e| SchemaError::InvalidUri {
            uri: base.to_string(),
            message: e.to_string(),
            location: self.describe(&location),
        })?;
        let resource = self.add_resource(base.clone(), location.clone(), draft);
        self.walk(
            value,
            location,
            Scope {
                base,
                resource,
                draft,
            },
        )
    }

    fn add_resource(&mut self, uri: Url, root: Location, draft: Draft) -> ResourceId {
        let id = ResourceId(self.resources.len());
        trace!(uri = %uri, draft = %draft, "registered schema resource");
        self.by_uri.entry(uri.as_str().to_string()).or_insert(id);
        self.resources.push(Resource {
            uri,
            root,
            draft,
            anchors: HashMap::new(),
            dynamic_anchors: HashMap::new(),
            recursive_anchor: false,
        });
        id
    }

    fn walk(&mut self, value: &'a Value, location: Location, mut scope: Scope) -> SchemaResult<()> {
        let Value::Object(map) = value else {
            self.scopes.insert(location, scope);
            return Ok(());
        };

        if !location.pointer.is_empty()
            && let Some(draft) = map
                .get("$schema")
                .and_then(Value::as_str)
                .and_then(Draft::from_meta_schema_uri)
        {
            scope.draft = draft;
        }
        let spec = scope.draft.spec();

        let ref_hides_id = spec.ref_overrides_siblings && map.contains_key("$ref");
        if !ref_hides_id && let Some(id) = map.get(spec.id_keyword).and_then(Value::as_str) {
            self.register_id(id, &location, &mut scope)?;
        }

        let resource = scope.resource.0;
        if spec.anchor_style == AnchorStyle::Keyword
            && let Some(name) = map.get("$anchor").and_then(Value::as_str)
        {
            self.resources[resource]
                .anchors
                .insert(name.to_string(), location.clone());
        }
        match spec.dynamic_ref {
            DynamicRefStyle::Dynamic => {
                if let Some(name) = map.get("$dynamicAnchor").and_then(Value::as_str) {
                    let entry = &mut self.resources[resource];
                    entry.anchors.insert(name.to_string(), location.clone());
                    entry
                        .dynamic_anchors
                        .insert(name.to_string(), location.clone());
                }
            }
            DynamicRefStyle::Recursive => {
                if map.get("$recursiveAnchor").and_then(Value::as_bool) == Some(true)
                    && self.resources[resource].root == location
                {
                    self.resources[resource].recursive_anchor = true;
                }
            }
            DynamicRefStyle::None => {}
        }

        self.scopes.insert(location.clone(), scope.clone());

        for (key, child) in map {
            let Some(shape) = spec.subschema_shape(key) else {
                continue;
            };
            let at = location.child(key);
            match (shape, child) {
                (SubschemaShape::Single, _) => self.walk(child, at, scope.clone())?,
                (SubschemaShape::SingleOrArray | SubschemaShape::Array, Value::Array(items)) => {
                    for (i, item) in items.iter().enumerate() {
                        self.walk(item, at.child_index(i), scope.clone())?;
                    }
                }
                (SubschemaShape::SingleOrArray, _) => self.walk(child, at, scope.clone())?,
                (SubschemaShape::Map | SubschemaShape::Dependencies, Value::Object(entries)) => {
                    for (name, sub) in entries {
                        if shape == SubschemaShape::Dependencies && sub.is_array() {
                            continue;
                        }
                        self.walk(sub, at.child(name), scope.clone())?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply an `id`/`$id` found at `location`, updating `scope` for the
    /// subtree below it.
    fn register_id(&mut self, id: &str, location: &Location, scope: &mut Scope) -> SchemaResult<()> {
        let anchor_style = scope.draft.spec().anchor_style;
        if let Some(name) = id.strip_prefix('#') {
            if anchor_style == AnchorStyle::IdFragment && !name.is_empty() {
                self.resources[scope.resource.0]
                    .anchors
                    .insert(name.to_string(), location.clone());
            }
            return Ok(());
        }

        let mut uri = scope.base.join(id).map_err(|e| SchemaError::InvalidUri {
            uri: id.to_string(),
            message: e.to_string(),
            location: self.describe(location),
        })?;
        let fragment = uri.fragment().map(str::to_owned);
        uri.set_fragment(None);

        let resource = if location.pointer.is_empty() {
            // The document root adopts its declared identifier
            let root = scope.resource;
            self.resources[root.0].uri = uri.clone();
            self.resources[root.0].draft = scope.draft;
            self.by_uri.entry(uri.as_str().to_string()).or_insert(root);
            trace!(uri = %uri, "document root identified");
            root
        } else {
            self.add_resource(uri.clone(), location.clone(), scope.draft)
        };
        scope.base = uri;
        scope.resource = resource;

        if let Some(name) = fragment.filter(|f| !f.is_empty())
            && anchor_style == AnchorStyle::IdFragment
        {
            self.resources[resource.0]
                .anchors
                .insert(name, location.clone());
        }
        Ok(())
    }

    /// Resolve `reference` relative to `base`.
    ///
    /// `from` is the position of the referencing keyword, used only in
    /// error messages.
    pub fn resolve(&self, base: &Url, reference: &str, from: &Location) -> SchemaResult<Location> {
        let unresolved = || SchemaError::UnresolvedReference {
            reference: reference.to_string(),
            location: self.describe(from),
        };
        let mut target = base.join(reference).map_err(|e| SchemaError::InvalidUri {
            uri: reference.to_string(),
            message: e.to_string(),
            location: self.describe(from),
        })?;
        let fragment = target.fragment().unwrap_or("").to_string();
        target.set_fragment(None);

        let resource_id = self.by_uri.get(target.as_str()).ok_or_else(unresolved)?;
        let resource = &self.resources[resource_id.0];

        let decoded = percent_decode_str(&fragment)
            .decode_utf8()
            .map_err(|_| unresolved())?;
        let location = if decoded.is_empty() {
            resource.root.clone()
        } else if decoded.starts_with('/') {
            let location = Location {
                document: resource.root.document,
                pointer: format!("{}{}", resource.root.pointer, decoded),
            };
            if self.value_at(&location).is_none() {
                return Err(unresolved());
            }
            location
        } else {
            resource
                .anchors
                .get(decoded.as_ref())
                .cloned()
                .ok_or_else(unresolved)?
        };
        trace!(reference, target = %self.describe(&location), "resolved reference");
        Ok(location)
    }

    /// The scope at `location`, inherited from the nearest traversed
    /// ancestor when the traversal never reached it.
    pub fn scope_of(&self, location: &Location) -> Option<&Scope> {
        let mut current = location.clone();
        loop {
            if let Some(scope) = self.scopes.get(&current) {
                return Some(scope);
            }
            current = current.parent()?;
        }
    }

    pub fn value_at(&self, location: &Location) -> Option<&'a Value> {
        let document: &'a Value = self.documents.get(location.document)?;
        document.pointer(&location.pointer)
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource(&self, id: ResourceId) -> &Resource {
        &self.resources[id.0]
    }

    /// Whether `location` carries `$dynamicAnchor: name` for its resource.
    pub fn is_dynamic_anchor(&self, location: &Location, name: &str) -> bool {
        self.scope_of(location).is_some_and(|scope| {
            self.resource(scope.resource).dynamic_anchors.get(name) == Some(location)
        })
    }

    /// Whether `location` is a resource root with `$recursiveAnchor: true`.
    pub fn is_recursive_anchor(&self, location: &Location) -> bool {
        self.scope_of(location).is_some_and(|scope| {
            let resource = self.resource(scope.resource);
            resource.recursive_anchor && &resource.root == location
        })
    }

    /// Human-readable position for error messages, e.g. `#/items/0`.
    pub fn describe(&self, location: &Location) -> String {
        let name = self
            .document_names
            .get(location.document)
            .map(String::as_str)
            .unwrap_or("");
        format!("{}#{}", name, location.pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_schema_value::parse;

    fn build(text: &str, draft: Draft) -> (Value, Draft) {
        (parse(text).unwrap(), draft)
    }

    fn root_base() -> Url {
        Url::parse(DEFAULT_BASE_URI).unwrap()
    }

    #[test]
    fn test_pointer_fragment() {
        let (schema, draft) = build(r#"{"definitions": {"a": {"type": "string"}}}"#, Draft::Draft7);
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        let loc = ctx.resolve(&root_base(), "#/definitions/a", &Location::root(0)).unwrap();
        assert_eq!(loc.pointer, "/definitions/a");
        assert!(ctx.value_at(&loc).unwrap().get("type").is_some());
    }

    #[test]
    fn test_empty_fragment_is_resource_root() {
        let (schema, draft) = build(r##"{"items": {"$ref": "#"}}"##, Draft::Draft7);
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        let loc = ctx.resolve(&root_base(), "#", &Location::root(0)).unwrap();
        assert_eq!(loc, Location::root(0));
    }

    #[test]
    fn test_percent_encoded_pointer() {
        let (schema, draft) = build(r#"{"definitions": {"a b": {}, "c%d": {}}}"#, Draft::Draft7);
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        let loc = ctx.resolve(&root_base(), "#/definitions/a%20b", &Location::root(0)).unwrap();
        assert_eq!(loc.pointer, "/definitions/a b");
        let loc = ctx.resolve(&root_base(), "#/definitions/c%25d", &Location::root(0)).unwrap();
        assert_eq!(loc.pointer, "/definitions/c%d");
    }

    #[test]
    fn test_nested_id_changes_base() {
        let (schema, draft) = build(
            r#"{
                "$id": "http://example.com/root.json",
                "definitions": {
                    "item": {"$id": "item.json", "definitions": {"x": {"type": "integer"}}}
                }
            }"#,
            Draft::Draft7,
        );
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        let base = Url::parse("http://example.com/root.json").unwrap();
        let item = ctx.resolve(&base, "item.json", &Location::root(0)).unwrap();
        assert_eq!(item.pointer, "/definitions/item");
        let x = ctx.resolve(&base, "item.json#/definitions/x", &Location::root(0)).unwrap();
        assert_eq!(x.pointer, "/definitions/item/definitions/x");

        let scope = ctx.scope_of(&x).unwrap();
        assert_eq!(scope.base.as_str(), "http://example.com/item.json");
    }

    #[test]
    fn test_legacy_fragment_anchor() {
        let (schema, draft) = build(
            r##"{"definitions": {"a": {"$id": "#foo", "type": "integer"}}}"##,
            Draft::Draft7,
        );
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        let loc = ctx.resolve(&root_base(), "#foo", &Location::root(0)).unwrap();
        assert_eq!(loc.pointer, "/definitions/a");
    }

    #[test]
    fn test_root_id_renames_root_resource() {
        let (schema, draft) = build(
            r##"{
                "$id": "http://example.com/root.json#top",
                "definitions": {"a": {"$ref": "#top"}}
            }"##,
            Draft::Draft7,
        );
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        let base = Url::parse("http://example.com/root.json").unwrap();
        let loc = ctx.resolve(&base, "#top", &Location::root(0)).unwrap();
        assert_eq!(loc, Location::root(0));
        let loc = ctx
            .resolve(&root_base(), "http://example.com/root.json", &Location::root(0))
            .unwrap();
        assert_eq!(loc, Location::root(0));
        let scope = ctx.scope_of(&loc).unwrap();
        assert_eq!(scope.base.as_str(), "http://example.com/root.json");
    }

    #[test]
    fn test_draft4_uses_plain_id() {
        let (schema, draft) = build(
            r##"{"definitions": {"a": {"id": "#bar"}, "b": {"$id": "#baz"}}}"##,
            Draft::Draft4,
        );
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        assert!(ctx.resolve(&root_base(), "#bar", &Location::root(0)).is_ok());
        assert!(ctx.resolve(&root_base(), "#baz", &Location::root(0)).is_err());
    }

    #[test]
    fn test_anchor_keyword() {
        let (schema, draft) = build(
            r#"{"$defs": {"a": {"$anchor": "thing", "type": "integer"}}}"#,
            Draft::Draft202012,
        );
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        let loc = ctx.resolve(&root_base(), "#thing", &Location::root(0)).unwrap();
        assert_eq!(loc.pointer, "/$defs/a");
    }

    #[test]
    fn test_ref_hides_sibling_id_in_draft7() {
        let (schema, draft) = build(
            r##"{
                "$id": "http://example.com/root.json",
                "definitions": {
                    "a": {"$id": "other.json", "$ref": "#/definitions/b"},
                    "b": {}
                }
            }"##,
            Draft::Draft7,
        );
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        let base = Url::parse("http://example.com/root.json").unwrap();
        assert!(ctx.resolve(&base, "other.json", &Location::root(0)).is_err());
    }

    #[test]
    fn test_unresolved_reference() {
        let (schema, draft) = build(r#"{"type": "object"}"#, Draft::Draft7);
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        for reference in ["#/definitions/missing", "#nope", "http://example.com/x.json"] {
            let err = ctx.resolve(&root_base(), reference, &Location::root(0)).unwrap_err();
            assert!(matches!(err, SchemaError::UnresolvedReference { .. }), "{}", reference);
        }
    }

    #[test]
    fn test_meta_schemas_are_opt_in() {
        let (schema, draft) = build(r#"{}"#, Draft::Draft7);
        let without = ResolutionContext::build(&schema, draft, false).unwrap();
        let meta = "http://json-schema.org/draft-07/schema#";
        assert!(without.resolve(&root_base(), meta, &Location::root(0)).is_err());

        let with = ResolutionContext::build(&schema, draft, true).unwrap();
        let loc = with.resolve(&root_base(), meta, &Location::root(0)).unwrap();
        assert_ne!(loc.document, 0);
        assert_eq!(with.scope_of(&loc).unwrap().draft, Draft::Draft7);
    }

    #[test]
    fn test_schema_keyword_switches_draft() {
        let (schema, draft) = build(
            r#"{"definitions": {"old": {"$schema": "http://json-schema.org/draft-04/schema#", "id": "old.json"}}}"#,
            Draft::Draft202012,
        );
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        let loc = ctx.resolve(&root_base(), "old.json", &Location::root(0)).unwrap();
        assert_eq!(ctx.scope_of(&loc).unwrap().draft, Draft::Draft4);
    }

    #[test]
    fn test_untraversed_location_inherits_scope() {
        let (schema, draft) = build(
            r#"{"$id": "http://example.com/s.json", "x-custom": {"nested": {"type": "string"}}}"#,
            Draft::Draft7,
        );
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        let base = Url::parse("http://example.com/s.json").unwrap();
        let loc = ctx.resolve(&base, "#/x-custom/nested", &Location::root(0)).unwrap();
        assert_eq!(ctx.scope_of(&loc).unwrap().base.as_str(), "http://example.com/s.json");
    }

    #[test]
    fn test_dynamic_and_recursive_anchors() {
        let (schema, draft) = build(
            r#"{"$dynamicAnchor": "node", "$defs": {"inner": {"$id": "inner", "$dynamicAnchor": "node"}}}"#,
            Draft::Draft202012,
        );
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        assert!(ctx.is_dynamic_anchor(&Location::root(0), "node"));
        let with_anchor = ctx
            .resources()
            .iter()
            .filter(|r| r.dynamic_anchors.contains_key("node"))
            .count();
        assert_eq!(with_anchor, 2);

        let (schema, draft) = build(r#"{"$recursiveAnchor": true}"#, Draft::Draft201909);
        let ctx = ResolutionContext::build(&schema, draft, false).unwrap();
        assert!(ctx.is_recursive_anchor(&Location::root(0)));
    }

    #[test]
    fn test_describe_locations() {
        let (schema, draft) = build(r#"{}"#, Draft::Draft7);
        let ctx = ResolutionContext::build(&schema, draft, true).unwrap();
        assert_eq!(ctx.describe(&Location::root(0).child("a/b")), "#/a~1b");
        assert!(ctx.describe(&Location::root(1)).starts_with("http://json-schema.org/draft-04/schema#"));
    }
}
