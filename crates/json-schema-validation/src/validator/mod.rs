// JSON validation engine

mod evaluated;

use crate::content::{self, ContentCheck};
use crate::error::{ValidationError, ValidationErrorKind};
use crate::resolver::ResourceId;
use crate::schema::CompiledSchema;
use crate::schema::types::{Dependency, ItemsRule, NodeBody, NodeId, PropertiesRule, Rule};
use json_schema_value::{JsonPointer, Map, Number, PathSegment, Value};
use std::cmp::Ordering;
use tracing::debug;

/// Validate `instance` and return every error, in schema traversal order.
pub fn validate(schema: &CompiledSchema, instance: &Value) -> Vec<ValidationError> {
    let mut context = ValidationContext::new(schema, true);
    context.validate_node(schema.root, instance);
    debug!(errors = context.errors.len(), "validated instance");
    context.errors
}

/// Check `instance`, stopping at the first failure.
pub fn is_valid(schema: &CompiledSchema, instance: &Value) -> bool {
    let mut context = ValidationContext::new(schema, false);
    context.validate_node(schema.root, instance);
    debug!(valid = !context.failed, "checked instance");
    !context.failed
}

/// Validation context tracks state during validation
pub(crate) struct ValidationContext<'s> {
    schema: &'s CompiledSchema,
    /// Current instance path (e.g. `/items/0`)
    instance_path: JsonPointer,
    /// Current schema path (e.g. `/properties/items/items/type`)
    schema_path: JsonPointer,
    /// Resources entered so far, outermost first
    dynamic_scope: Vec<ResourceId>,
    errors: Vec<ValidationError>,
    /// Whether anything failed since the last reset
    failed: bool,
    /// Record errors (exhaustive mode) or only note failure
    collect: bool,
}

impl<'s> ValidationContext<'s> {
    fn new(schema: &'s CompiledSchema, collect: bool) -> Self {
        Self {
            schema,
            instance_path: JsonPointer::new(),
            schema_path: JsonPointer::new(),
            dynamic_scope: Vec::new(),
            errors: Vec::new(),
            failed: false,
            collect,
        }
    }

    fn add_error(&mut self, kind: ValidationErrorKind, instance: &Value) {
        self.add_error_with_context(kind, instance, Vec::new());
    }

    fn add_error_with_context(
        &mut self,
        kind: ValidationErrorKind,
        instance: &Value,
        context: Vec<ValidationError>,
    ) {
        self.failed = true;
        if self.collect {
            let error = ValidationError::new(
                kind,
                instance.clone(),
                self.instance_path.clone(),
                self.schema_path.clone(),
            )
            .with_context(context);
            self.errors.push(error);
        }
    }

    /// In short-circuit mode, the first failure ends the traversal
    fn should_stop(&self) -> bool {
        self.failed && !self.collect
    }

    /// Execute a function with a new instance path segment
    fn with_instance_path<F, R>(&mut self, segment: impl Into<PathSegment>, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.instance_path.push(segment);
        let result = f(self);
        self.instance_path.pop();
        result
    }

    /// Execute a function with a new schema path segment
    fn with_schema_path<F, R>(&mut self, segment: impl Into<PathSegment>, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.schema_path.push(segment);
        let result = f(self);
        self.schema_path.pop();
        result
    }

    /// Run `f` without recording errors and report whether it passed.
    /// The context's failure state is left as it was.
    fn passes<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut Self),
    {
        let (failed, collect) = (self.failed, self.collect);
        self.failed = false;
        self.collect = false;
        f(self);
        let passed = !self.failed;
        self.failed = failed;
        self.collect = collect;
        passed
    }

    /// Run `f` and take the errors it recorded instead of keeping them.
    fn capture<F>(&mut self, f: F) -> (bool, Vec<ValidationError>)
    where
        F: FnOnce(&mut Self),
    {
        if !self.collect {
            return (self.passes(f), Vec::new());
        }
        let outer_errors = std::mem::take(&mut self.errors);
        let failed = self.failed;
        self.failed = false;
        f(self);
        let passed = !self.failed;
        let branch_errors = std::mem::replace(&mut self.errors, outer_errors);
        self.failed = failed;
        (passed, branch_errors)
    }

    /// Push `resource` onto the dynamic scope unless it is already on top.
    fn enter_resource(&mut self, resource: ResourceId) -> bool {
        if self.dynamic_scope.last() == Some(&resource) {
            return false;
        }
        self.dynamic_scope.push(resource);
        true
    }

    fn dynamic_target(&self, target: NodeId, anchor: Option<&str>) -> NodeId {
        let Some(name) = anchor else {
            return target;
        };
        self.dynamic_scope
            .iter()
            .find_map(|resource| {
                self.schema.resources[resource.0]
                    .dynamic_anchors
                    .get(name)
                    .copied()
            })
            .unwrap_or(target)
    }

    fn recursive_target(&self, target: NodeId, dynamic: bool) -> NodeId {
        if !dynamic {
            return target;
        }
        self.dynamic_scope
            .iter()
            .find_map(|resource| self.schema.resources[resource.0].recursive_anchor)
            .unwrap_or(target)
    }

    pub(crate) fn validate_node(&mut self, id: NodeId, instance: &Value) {
        let schema = self.schema;
        let node = schema.node(id);
        let entered = self.enter_resource(node.resource);
        match &node.body {
            NodeBody::Bool(true) => {}
            NodeBody::Bool(false) => self.add_error(ValidationErrorKind::FalseSchema, instance),
            NodeBody::Rules(rules) => {
                for rule in rules {
                    if self.should_stop() {
                        break;
                    }
                    match rule.keyword() {
                        Some(keyword) => self.with_schema_path(keyword, |ctx| {
                            ctx.validate_rule(id, rule, instance)
                        }),
                        None => self.validate_rule(id, rule, instance),
                    }
                }
            }
        }
        if entered {
            self.dynamic_scope.pop();
        }
    }

    fn validate_rule(&mut self, current: NodeId, rule: &Rule, instance: &Value) {
        match rule {
            Rule::Type {
                types,
                integer_accepts_float,
            } => {
                if !types
                    .iter()
                    .any(|ty| ty.matches(instance, *integer_accepts_float))
                {
                    let expected = types.iter().map(|ty| ty.name().to_string()).collect();
                    self.add_error(ValidationErrorKind::Type { expected }, instance);
                }
            }
            Rule::Enum(options) => {
                let found = options
                    .as_array()
                    .is_some_and(|options| options.contains(instance));
                if !found {
                    self.add_error(
                        ValidationErrorKind::Enum {
                            options: options.clone(),
                        },
                        instance,
                    );
                }
            }
            Rule::Const(expected) => {
                if instance != expected {
                    self.add_error(
                        ValidationErrorKind::Const {
                            expected: expected.clone(),
                        },
                        instance,
                    );
                }
            }
            Rule::Minimum {
                limit, exclusive, ..
            } => {
                if let Value::Number(n) = instance {
                    self.validate_minimum(n, limit, *exclusive, instance);
                }
            }
            Rule::Maximum {
                limit, exclusive, ..
            } => {
                if let Value::Number(n) = instance {
                    self.validate_maximum(n, limit, *exclusive, instance);
                }
            }
            Rule::MultipleOf(divisor) => {
                if let Value::Number(n) = instance
                    && !is_multiple_of(n, divisor)
                {
                    self.add_error(
                        ValidationErrorKind::MultipleOf {
                            multiple_of: *divisor,
                        },
                        instance,
                    );
                }
            }
            Rule::MinLength(limit) => {
                if let Value::String(s) = instance
                    && (s.chars().count() as u64) < *limit
                {
                    self.add_error(ValidationErrorKind::MinLength { limit: *limit }, instance);
                }
            }
            Rule::MaxLength(limit) => {
                if let Value::String(s) = instance
                    && (s.chars().count() as u64) > *limit
                {
                    self.add_error(ValidationErrorKind::MaxLength { limit: *limit }, instance);
                }
            }
            Rule::Pattern { regex, source } => {
                if let Value::String(s) = instance
                    && !regex.is_match(s).unwrap_or(false)
                {
                    self.add_error(
                        ValidationErrorKind::Pattern {
                            pattern: source.clone(),
                        },
                        instance,
                    );
                }
            }
            Rule::Format { format, name } => {
                if let Value::String(s) = instance
                    && !format.is_valid(s)
                {
                    self.add_error(
                        ValidationErrorKind::Format {
                            format: name.clone(),
                        },
                        instance,
                    );
                }
            }
            Rule::Content {
                encoding,
                media_type,
            } => {
                if let Value::String(s) = instance {
                    match content::check(s, *encoding, *media_type) {
                        ContentCheck::Valid => {}
                        ContentCheck::BadEncoding => {
                            let encoding = encoding.map(|e| e.name()).unwrap_or_default();
                            self.with_schema_path("contentEncoding", |ctx| {
                                ctx.add_error(
                                    ValidationErrorKind::ContentEncoding {
                                        encoding: encoding.to_string(),
                                    },
                                    instance,
                                )
                            });
                        }
                        ContentCheck::BadMediaType => {
                            let media_type = media_type.map(|m| m.name()).unwrap_or_default();
                            self.with_schema_path("contentMediaType", |ctx| {
                                ctx.add_error(
                                    ValidationErrorKind::ContentMediaType {
                                        media_type: media_type.to_string(),
                                    },
                                    instance,
                                )
                            });
                        }
                    }
                }
            }
            Rule::MinItems(limit) => {
                if let Value::Array(items) = instance
                    && (items.len() as u64) < *limit
                {
                    self.add_error(ValidationErrorKind::MinItems { limit: *limit }, instance);
                }
            }
            Rule::MaxItems(limit) => {
                if let Value::Array(items) = instance
                    && (items.len() as u64) > *limit
                {
                    self.add_error(ValidationErrorKind::MaxItems { limit: *limit }, instance);
                }
            }
            Rule::UniqueItems => {
                if let Value::Array(items) = instance
                    && has_duplicates(items)
                {
                    self.add_error(ValidationErrorKind::UniqueItems, instance);
                }
            }
            Rule::Items(items_rule) => {
                if let Value::Array(items) = instance {
                    self.validate_items(items_rule, items, instance);
                }
            }
            Rule::Contains {
                node, min, max, ..
            } => {
                if let Value::Array(items) = instance {
                    self.validate_contains(*node, *min, *max, items, instance);
                }
            }
            Rule::Required(properties) => {
                if let Value::Object(map) = instance {
                    self.validate_required(properties, map, instance);
                }
            }
            Rule::MinProperties(limit) => {
                if let Value::Object(map) = instance
                    && (map.len() as u64) < *limit
                {
                    self.add_error(ValidationErrorKind::MinProperties { limit: *limit }, instance);
                }
            }
            Rule::MaxProperties(limit) => {
                if let Value::Object(map) = instance
                    && (map.len() as u64) > *limit
                {
                    self.add_error(ValidationErrorKind::MaxProperties { limit: *limit }, instance);
                }
            }
            Rule::Properties(properties_rule) => {
                if let Value::Object(map) = instance {
                    self.validate_properties(properties_rule, map, instance);
                }
            }
            Rule::PropertyNames(node) => {
                if let Value::Object(map) = instance {
                    for key in map.keys() {
                        if self.should_stop() {
                            break;
                        }
                        self.validate_node(*node, &Value::String(key.clone()));
                    }
                }
            }
            Rule::Dependencies { entries, .. } => {
                if let Value::Object(map) = instance {
                    for (name, dependency) in entries {
                        if self.should_stop() {
                            break;
                        }
                        if !map.contains_key(name) {
                            continue;
                        }
                        self.with_schema_path(name.as_str(), |ctx| match dependency {
                            Dependency::Required(properties) => {
                                ctx.validate_required(properties, map, instance)
                            }
                            Dependency::Schema(node) => ctx.validate_node(*node, instance),
                        });
                    }
                }
            }
            Rule::AllOf(nodes) => {
                for (index, node) in nodes.iter().enumerate() {
                    if self.should_stop() {
                        break;
                    }
                    self.with_schema_path(index, |ctx| ctx.validate_node(*node, instance));
                }
            }
            Rule::AnyOf(nodes) => {
                let mut context = Vec::new();
                for (index, node) in nodes.iter().enumerate() {
                    let (passed, errors) = self.capture(|ctx| {
                        ctx.with_schema_path(index, |ctx| ctx.validate_node(*node, instance))
                    });
                    if passed {
                        return;
                    }
                    context.extend(errors);
                }
                self.add_error_with_context(ValidationErrorKind::AnyOf, instance, context);
            }
            Rule::OneOf(nodes) => {
                let mut passing = 0;
                let mut context = Vec::new();
                for (index, node) in nodes.iter().enumerate() {
                    let (passed, errors) = self.capture(|ctx| {
                        ctx.with_schema_path(index, |ctx| ctx.validate_node(*node, instance))
                    });
                    if passed {
                        passing += 1;
                        if passing > 1 {
                            break;
                        }
                    } else {
                        context.extend(errors);
                    }
                }
                match passing {
                    0 => self.add_error_with_context(
                        ValidationErrorKind::OneOfNotValid,
                        instance,
                        context,
                    ),
                    1 => {}
                    _ => self.add_error(ValidationErrorKind::OneOfMultipleValid, instance),
                }
            }
            Rule::Not { node, schema } => {
                if self.passes(|ctx| ctx.validate_node(*node, instance)) {
                    self.add_error(
                        ValidationErrorKind::Not {
                            schema: schema.clone(),
                        },
                        instance,
                    );
                }
            }
            Rule::Conditional {
                if_node,
                then_node,
                else_node,
            } => {
                let matched = self.with_schema_path("if", |ctx| {
                    ctx.passes(|ctx| ctx.validate_node(*if_node, instance))
                });
                let branch = if matched {
                    then_node.map(|node| ("then", node))
                } else {
                    else_node.map(|node| ("else", node))
                };
                if let Some((keyword, node)) = branch {
                    self.with_schema_path(keyword, |ctx| ctx.validate_node(node, instance));
                }
            }
            Rule::Ref(target) => self.validate_node(*target, instance),
            Rule::DynamicRef { target, anchor } => {
                let target = self.dynamic_target(*target, anchor.as_deref());
                self.validate_node(target, instance);
            }
            Rule::RecursiveRef { target, dynamic } => {
                let target = self.recursive_target(*target, *dynamic);
                self.validate_node(target, instance);
            }
            Rule::UnevaluatedProperties(node) => {
                if let Value::Object(map) = instance {
                    self.validate_unevaluated_properties(current, *node, map, instance);
                }
            }
            Rule::UnevaluatedItems(node) => {
                if let Value::Array(items) = instance {
                    self.validate_unevaluated_items(current, *node, items, instance);
                }
            }
        }
    }

    fn validate_minimum(&mut self, n: &Number, limit: &Number, exclusive: bool, instance: &Value) {
        let fails = match n.compare(limit) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => exclusive,
            _ => false,
        };
        if fails {
            let limit = *limit;
            let kind = if exclusive {
                ValidationErrorKind::ExclusiveMinimum { limit }
            } else {
                ValidationErrorKind::Minimum { limit }
            };
            self.add_error(kind, instance);
        }
    }

    fn validate_maximum(&mut self, n: &Number, limit: &Number, exclusive: bool, instance: &Value) {
        let fails = match n.compare(limit) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => exclusive,
            _ => false,
        };
        if fails {
            let limit = *limit;
            let kind = if exclusive {
                ValidationErrorKind::ExclusiveMaximum { limit }
            } else {
                ValidationErrorKind::Maximum { limit }
            };
            self.add_error(kind, instance);
        }
    }

    fn validate_items(&mut self, rule: &ItemsRule, items: &[Value], instance: &Value) {
        for (index, (node, item)) in rule.prefix.iter().zip(items).enumerate() {
            if self.should_stop() {
                return;
            }
            self.with_schema_path(rule.prefix_keyword, |ctx| {
                ctx.with_schema_path(index, |ctx| {
                    ctx.with_instance_path(index, |ctx| ctx.validate_node(*node, item))
                })
            });
        }

        let Some(rest) = rule.rest else {
            return;
        };
        if items.len() <= rule.prefix.len() {
            return;
        }
        if self.schema.is_false(rest) {
            let unexpected = items[rule.prefix.len()..].to_vec();
            self.with_schema_path(rule.rest_keyword, |ctx| {
                ctx.add_error(ValidationErrorKind::AdditionalItems { unexpected }, instance)
            });
            return;
        }
        for (index, item) in items.iter().enumerate().skip(rule.prefix.len()) {
            if self.should_stop() {
                return;
            }
            self.with_schema_path(rule.rest_keyword, |ctx| {
                ctx.with_instance_path(index, |ctx| ctx.validate_node(rest, item))
            });
        }
    }

    fn validate_contains(
        &mut self,
        node: NodeId,
        min: u64,
        max: Option<u64>,
        items: &[Value],
        instance: &Value,
    ) {
        let mut matched: u64 = 0;
        for (index, item) in items.iter().enumerate() {
            let passed = self.passes(|ctx| {
                ctx.with_instance_path(index, |ctx| ctx.validate_node(node, item))
            });
            if passed {
                matched += 1;
            }
        }

        if matched < min {
            if matched == 0 && min == 1 {
                self.with_schema_path("contains", |ctx| {
                    ctx.add_error(ValidationErrorKind::Contains, instance)
                });
            } else {
                self.with_schema_path("minContains", |ctx| {
                    ctx.add_error(ValidationErrorKind::MinContains { limit: min }, instance)
                });
            }
        }
        if let Some(max) = max
            && matched > max
        {
            self.with_schema_path("maxContains", |ctx| {
                ctx.add_error(ValidationErrorKind::MaxContains { limit: max }, instance)
            });
        }
    }

    fn validate_required(&mut self, properties: &[String], map: &Map, instance: &Value) {
        for property in properties {
            if self.should_stop() {
                return;
            }
            if !map.contains_key(property) {
                self.add_error(
                    ValidationErrorKind::Required {
                        property: property.clone(),
                    },
                    instance,
                );
            }
        }
    }

    fn validate_properties(&mut self, rule: &PropertiesRule, map: &Map, instance: &Value) {
        for (name, node) in &rule.properties {
            if self.should_stop() {
                return;
            }
            if let Some(child) = map.get(name) {
                self.with_schema_path("properties", |ctx| {
                    ctx.with_schema_path(name.as_str(), |ctx| {
                        ctx.with_instance_path(name.as_str(), |ctx| ctx.validate_node(*node, child))
                    })
                });
            }
        }

        for (regex, source, node) in &rule.patterns {
            for (key, child) in map {
                if self.should_stop() {
                    return;
                }
                if regex.is_match(key).unwrap_or(false) {
                    self.with_schema_path("patternProperties", |ctx| {
                        ctx.with_schema_path(source.as_str(), |ctx| {
                            ctx.with_instance_path(key.as_str(), |ctx| {
                                ctx.validate_node(*node, child)
                            })
                        })
                    });
                }
            }
        }

        let Some(additional) = rule.additional else {
            return;
        };
        let extras: Vec<(&String, &Value)> =
            map.iter().filter(|(key, _)| !rule.matches_key(key)).collect();
        if extras.is_empty() {
            return;
        }
        if self.schema.is_false(additional) {
            let unexpected = extras.into_iter().map(|(key, _)| key.clone()).collect();
            self.with_schema_path("additionalProperties", |ctx| {
                ctx.add_error(
                    ValidationErrorKind::AdditionalProperties { unexpected },
                    instance,
                )
            });
            return;
        }
        for (key, child) in extras {
            if self.should_stop() {
                return;
            }
            self.with_schema_path("additionalProperties", |ctx| {
                ctx.with_instance_path(key.as_str(), |ctx| ctx.validate_node(additional, child))
            });
        }
    }

    fn validate_unevaluated_properties(
        &mut self,
        current: NodeId,
        node: NodeId,
        map: &Map,
        instance: &Value,
    ) {
        let evaluated = self.evaluated(current, instance);
        let remaining: Vec<(&String, &Value)> = map
            .iter()
            .filter(|(key, _)| !evaluated.has_key(key))
            .collect();
        if remaining.is_empty() {
            return;
        }
        if self.schema.is_false(node) {
            let unexpected = remaining.into_iter().map(|(key, _)| key.clone()).collect();
            self.add_error(
                ValidationErrorKind::UnevaluatedProperties { unexpected },
                instance,
            );
            return;
        }
        for (key, child) in remaining {
            if self.should_stop() {
                return;
            }
            self.with_instance_path(key.as_str(), |ctx| ctx.validate_node(node, child));
        }
    }

    fn validate_unevaluated_items(
        &mut self,
        current: NodeId,
        node: NodeId,
        items: &[Value],
        instance: &Value,
    ) {
        let evaluated = self.evaluated(current, instance);
        let remaining: Vec<(usize, &Value)> = items
            .iter()
            .enumerate()
            .filter(|(index, _)| !evaluated.has_index(*index))
            .collect();
        if remaining.is_empty() {
            return;
        }
        if self.schema.is_false(node) {
            let unexpected = remaining.into_iter().map(|(_, item)| item.clone()).collect();
            self.add_error(ValidationErrorKind::UnevaluatedItems { unexpected }, instance);
            return;
        }
        for (index, item) in remaining {
            if self.should_stop() {
                return;
            }
            self.with_instance_path(index, |ctx| ctx.validate_node(node, item));
        }
    }
}

/// Integers are compared exactly; otherwise the quotient must be
/// integral up to a relative epsilon.
fn is_multiple_of(n: &Number, divisor: &Number) -> bool {
    if let (Some(a), Some(b)) = (n.as_i128(), divisor.as_i128()) {
        return b != 0 && a % b == 0;
    }
    let quotient = n.as_f64() / divisor.as_f64();
    if !quotient.is_finite() {
        return false;
    }
    (quotient - quotient.round()).abs() <= f64::EPSILON * quotient.abs().max(1.0)
}

fn has_duplicates(items: &[Value]) -> bool {
    items
        .iter()
        .enumerate()
        .any(|(index, item)| items[..index].contains(item))
}
