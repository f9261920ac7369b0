//! Processing-order queries over a populated graph.
//!
//! Two contracts are offered. [`DependencyGraph::topological_order`] is
//! best-effort: on a cyclic graph it returns all node ids in insertion order
//! and leaves cycle detection to [`DependencyGraph::has_cycles`], so callers
//! can plan a push while still reporting the cycle as a validation problem.
//! [`DependencyGraph::try_topological_order`] is strict: it fails on cycles
//! and hands back the largest acyclic prefix plus the cyclic remainder.

use std::collections::{BTreeMap, HashMap, VecDeque};

use thiserror::Error;

use crate::graph::DependencyGraph;

/// Returned by [`DependencyGraph::try_topological_order`] when the graph is
/// cyclic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dependency cycle detected; {} node(s) could not be ordered", .cyclic.len())]
pub struct CycleError {
    /// Largest acyclic prefix, in dependency order.
    pub ordered: Vec<String>,
    /// Nodes that sit on a cycle or depend on one, in insertion order.
    pub cyclic: Vec<String>,
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

impl DependencyGraph {
    /// All node ids ordered so that every dependency precedes its dependents.
    ///
    /// When the graph is cyclic a true topological order does not exist; the
    /// full id list is returned in insertion order instead of failing.
    /// Callers that need to distinguish the two cases query
    /// [`has_cycles`](Self::has_cycles) or use
    /// [`try_topological_order`](Self::try_topological_order).
    pub fn topological_order(&self) -> Vec<String> {
        match self.try_topological_order() {
            Ok(order) => order,
            Err(_) => self.node_ids().to_vec(),
        }
    }

    /// Strict topological order, failing on cycles.
    pub fn try_topological_order(&self) -> Result<Vec<String>, CycleError> {
        // Kahn's algorithm. "Dependencies before dependents" means a node is
        // ready once all of its outgoing (depends_on) edges are resolved, so
        // the working in-degree counts outgoing edges, not incoming ones.
        let mut pending: BTreeMap<&str, usize> = BTreeMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        for id in self.node_ids() {
            let Some(node) = self.node(id) else {
                continue;
            };
            pending.insert(id, node.depends_on.len());
            if node.depends_on.is_empty() {
                queue.push_back(id);
            }
        }

        let mut ordered = Vec::with_capacity(self.len());
        while let Some(id) = queue.pop_front() {
            ordered.push(id.to_string());
            let Some(node) = self.node(id) else {
                continue;
            };
            for dependent in &node.required_by {
                if let Some(count) = pending.get_mut(dependent.as_str()) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }

        if ordered.len() == self.len() {
            return Ok(ordered);
        }
        let cyclic = self
            .node_ids()
            .iter()
            .filter(|id| pending.get(id.as_str()).is_some_and(|count| *count > 0))
            .cloned()
            .collect();
        Err(CycleError { ordered, cyclic })
    }

    /// Whether any dependency cycle exists. Self-loops count.
    pub fn has_cycles(&self) -> bool {
        let mut marks: HashMap<&str, Mark> = self
            .node_ids()
            .iter()
            .map(|id| (id.as_str(), Mark::Unvisited))
            .collect();

        for start in self.node_ids() {
            if marks.get(start.as_str()) != Some(&Mark::Unvisited) {
                continue;
            }
            // Iterative DFS with an explicit stack; a back-edge to a node
            // still on the stack is a cycle.
            marks.insert(start, Mark::OnStack);
            let mut stack: Vec<(&str, Vec<&str>, usize)> = vec![(start, self.children(start), 0)];
            while let Some((_, children, index)) = stack.last_mut() {
                if *index < children.len() {
                    let next = children[*index];
                    *index += 1;
                    match marks.get(next) {
                        Some(Mark::OnStack) => return true,
                        Some(Mark::Done) => {}
                        _ => {
                            marks.insert(next, Mark::OnStack);
                            let grandchildren = self.children(next);
                            stack.push((next, grandchildren, 0));
                        }
                    }
                } else if let Some((id, _, _)) = stack.pop() {
                    marks.insert(id, Mark::Done);
                }
            }
        }
        false
    }

    fn children<'a>(&'a self, id: &str) -> Vec<&'a str> {
        self.node(id)
            .map(|node| node.depends_on.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::super::graph::DependencyGraph;

    fn chain() -> DependencyGraph {
        // rule -> group -> address
        let mut graph = DependencyGraph::new();
        graph.add_node("rule1", Some("security_rule"), Some(json!({})));
        graph.add_node("group1", Some("address_group"), Some(json!({})));
        graph.add_node("addr1", Some("address_object"), Some(json!({})));
        graph.add_dependency("rule1", "group1", Some("security_rule"), Some("address_group"));
        graph.add_dependency("group1", "addr1", Some("address_group"), Some("address_object"));
        graph
    }

    #[test]
    fn order_puts_dependencies_first() {
        let graph = chain();
        let order = graph.topological_order();
        for (from, to) in graph.edges() {
            let from_at = order.iter().position(|id| id == from).expect("from");
            let to_at = order.iter().position(|id| id == to).expect("to");
            assert!(to_at < from_at, "{to} must precede {from}");
        }
    }

    #[test]
    fn dag_has_no_cycles() {
        assert!(!chain().has_cycles());
    }

    #[test]
    fn mutual_dependency_is_a_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("a", "b", None, None);
        graph.add_dependency("b", "a", None, None);
        assert!(graph.has_cycles());
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut graph = chain();
        graph.add_dependency("addr1", "addr1", Some("address_object"), Some("address_object"));
        assert!(graph.has_cycles());
    }

    #[test]
    fn cyclic_graph_falls_back_to_insertion_order() {
        let mut graph = DependencyGraph::new();
        graph.add_node("a", Some("x"), Some(json!({})));
        graph.add_node("b", Some("x"), Some(json!({})));
        graph.add_dependency("a", "b", Some("x"), Some("x"));
        graph.add_dependency("b", "a", Some("x"), Some("x"));

        let order = graph.topological_order();
        assert_eq!(order, vec!["a".to_string(), "b".to_string()]);
        assert!(graph.has_cycles());
    }

    #[test]
    fn strict_order_reports_acyclic_prefix_and_remainder() {
        let mut graph = chain();
        graph.add_dependency("x", "y", None, None);
        graph.add_dependency("y", "x", None, None);

        let err = graph.try_topological_order().expect_err("cycle");
        assert_eq!(err.ordered.len(), 3);
        assert_eq!(err.cyclic, vec!["x".to_string(), "y".to_string()]);
    }
}
