// Detection of reference cycles that never consume instance structure

use super::types::{NodeBody, NodeId, ResourceScope, SchemaNode};

const UNVISITED: u8 = 0;
const ON_STACK: u8 = 1;
const DONE: u8 = 2;

/// Find a node on a cycle of in-place edges, if any.
///
/// In-place edges (`$ref`, combinators, conditionals, dependent schemas)
/// apply a subschema to the same instance location. Edges that descend
/// into properties or items are not followed, so recursion through them
/// terminates on finite instances and is allowed.
pub(super) fn find_in_place_cycle(
    nodes: &[SchemaNode],
    resources: &[ResourceScope],
) -> Option<NodeId> {
    let edges: Vec<Vec<NodeId>> = nodes
        .iter()
        .map(|node| {
            let mut children = Vec::new();
            if let NodeBody::Rules(rules) = &node.body {
                for rule in rules {
                    rule.in_place_children(resources, &mut children);
                }
            }
            children
        })
        .collect();

    let mut state = vec![UNVISITED; nodes.len()];
    for start in 0..nodes.len() {
        if state[start] != UNVISITED {
            continue;
        }
        state[start] = ON_STACK;
        let mut stack = vec![(start, 0usize)];
        while let Some(top) = stack.len().checked_sub(1) {
            let (node, next) = stack[top];
            if let Some(child) = edges[node].get(next) {
                stack[top].1 += 1;
                match state[child.0] {
                    UNVISITED => {
                        state[child.0] = ON_STACK;
                        stack.push((child.0, 0));
                    }
                    ON_STACK => return Some(*child),
                    _ => {}
                }
            } else {
                state[node] = DONE;
                stack.pop();
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResourceId;
    use crate::schema::types::Rule;

    fn node(rules: Vec<Rule>) -> SchemaNode {
        SchemaNode {
            resource: ResourceId(0),
            body: NodeBody::Rules(rules),
        }
    }

    #[test]
    fn test_direct_ref_cycle() {
        let nodes = vec![
            node(vec![Rule::Ref(NodeId(1))]),
            node(vec![Rule::Ref(NodeId(0))]),
        ];
        assert!(find_in_place_cycle(&nodes, &[]).is_some());
    }

    #[test]
    fn test_self_reference_through_combinator() {
        let nodes = vec![node(vec![Rule::AnyOf(vec![NodeId(0)])])];
        assert_eq!(find_in_place_cycle(&nodes, &[]), Some(NodeId(0)));
    }

    #[test]
    fn test_descending_recursion_is_allowed() {
        let nodes = vec![node(vec![Rule::PropertyNames(NodeId(0)), Rule::UnevaluatedItems(NodeId(0))])];
        assert_eq!(find_in_place_cycle(&nodes, &[]), None);
    }

    #[test]
    fn test_shared_target_is_not_a_cycle() {
        let nodes = vec![
            node(vec![Rule::AllOf(vec![NodeId(1), NodeId(2)])]),
            node(vec![Rule::Ref(NodeId(2))]),
            SchemaNode {
                resource: ResourceId(0),
                body: NodeBody::Bool(true),
            },
        ];
        assert_eq!(find_in_place_cycle(&nodes, &[]), None);
    }

    #[test]
    fn test_dynamic_candidates_are_edges() {
        let mut scope = ResourceScope::default();
        scope.dynamic_anchors.insert("node".to_string(), NodeId(0));
        let nodes = vec![node(vec![Rule::DynamicRef {
            target: NodeId(1),
            anchor: Some("node".to_string()),
        }]), node(vec![])];
        assert!(find_in_place_cycle(&nodes, &[scope]).is_some());
    }
}
