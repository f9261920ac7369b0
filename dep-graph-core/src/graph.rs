use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use serde_json::Value;

use crate::node::{Node, NodeOrigin};

/// A directed dependency graph over string node ids.
///
/// An edge `(from, to)` means "`from` depends on `to`". Construction is a
/// one-shot populate via [`add_node`](Self::add_node) and
/// [`add_dependency`](Self::add_dependency); all query operations treat the
/// graph as read-only. Both insertion operations are idempotent.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: HashMap<String, Node>,
    insertion: Vec<String>,
    edges: Vec<(String, String)>,
}

/// Aggregate counts for a populated graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub nodes_by_kind: BTreeMap<String, usize>,
    pub has_cycles: bool,
    pub max_dependencies: usize,
    pub max_dependents: usize,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node, idempotently.
    ///
    /// A new node becomes [`NodeOrigin::Real`] when a non-null payload is
    /// supplied and a reference placeholder otherwise. If the id already
    /// exists as a placeholder, a non-null payload promotes it to a real node
    /// (filling its kind if still unset); if it already exists as a real
    /// node, the call leaves it unchanged (first write wins).
    pub fn add_node(&mut self, id: &str, kind: Option<&str>, payload: Option<Value>) -> &Node {
        if let Some(node) = self.nodes.get_mut(id) {
            if node.is_reference() {
                if let Some(payload) = payload.filter(|value| !value.is_null()) {
                    node.payload = Some(payload);
                    node.origin = NodeOrigin::Real;
                }
                if node.kind.is_none() {
                    node.kind = kind.map(ToOwned::to_owned);
                }
            }
        } else {
            self.insertion.push(id.to_string());
            self.nodes.insert(id.to_string(), Node::new(id, kind, payload));
        }
        &self.nodes[id]
    }

    /// Record that `from` depends on `to`.
    ///
    /// Both endpoints are created as reference placeholders if absent, using
    /// the supplied kinds. A `None` kind stays `None` on the placeholder; it
    /// is never defaulted. Repeat additions of the same pair are no-ops.
    /// Self-edges are stored as-is and surface through
    /// [`has_cycles`](Self::has_cycles).
    pub fn add_dependency(
        &mut self,
        from: &str,
        to: &str,
        from_kind: Option<&str>,
        to_kind: Option<&str>,
    ) {
        self.ensure_node(from, from_kind);
        self.ensure_node(to, to_kind);

        let edge = (from.to_string(), to.to_string());
        if self.edges.contains(&edge) {
            return;
        }
        if let Some(node) = self.nodes.get_mut(from) {
            node.depends_on.insert(to.to_string());
        }
        if let Some(node) = self.nodes.get_mut(to) {
            node.required_by.insert(from.to_string());
        }
        self.edges.push(edge);
    }

    fn ensure_node(&mut self, id: &str, kind: Option<&str>) {
        if !self.nodes.contains_key(id) {
            self.insertion.push(id.to_string());
            self.nodes.insert(id.to_string(), Node::new(id, kind, None));
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> &[String] {
        &self.insertion
    }

    /// All recorded edges `(from, to)`, deduplicated, in insertion order.
    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    /// Ids the given node depends on. Empty for unknown ids.
    pub fn dependencies_of(&self, id: &str) -> BTreeSet<String> {
        self.nodes
            .get(id)
            .map(|node| node.depends_on.clone())
            .unwrap_or_default()
    }

    /// Ids that depend on the given node. Empty for unknown ids.
    pub fn dependents_of(&self, id: &str) -> BTreeSet<String> {
        self.nodes
            .get(id)
            .map(|node| node.required_by.clone())
            .unwrap_or_default()
    }

    /// Ids of nodes backed by a real definition.
    ///
    /// Reference placeholders never count as available: they exist only so an
    /// edge could be recorded before (or without) the real definition being
    /// seen.
    pub fn real_ids(&self) -> BTreeSet<String> {
        self.nodes
            .values()
            .filter(|node| !node.is_reference())
            .map(|node| node.id.clone())
            .collect()
    }

    /// Report, per node, the dependency targets not present in `available`.
    ///
    /// Nodes with no missing targets are omitted from the result.
    pub fn find_missing_dependencies(
        &self,
        available: &BTreeSet<String>,
    ) -> BTreeMap<String, Vec<String>> {
        let mut out = BTreeMap::new();
        for id in &self.insertion {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let missing: Vec<String> = node
                .depends_on
                .iter()
                .filter(|target| !available.contains(*target))
                .cloned()
                .collect();
            if !missing.is_empty() {
                out.insert(id.clone(), missing);
            }
        }
        out
    }

    pub fn statistics(&self) -> GraphStatistics {
        let mut nodes_by_kind: BTreeMap<String, usize> = BTreeMap::new();
        let mut max_dependencies = 0;
        let mut max_dependents = 0;
        for node in self.nodes.values() {
            let kind = node.kind.as_deref().unwrap_or("unknown");
            *nodes_by_kind.entry(kind.to_string()).or_insert(0) += 1;
            max_dependencies = max_dependencies.max(node.depends_on.len());
            max_dependents = max_dependents.max(node.required_by.len());
        }
        GraphStatistics {
            total_nodes: self.nodes.len(),
            total_edges: self.edges.len(),
            nodes_by_kind,
            has_cycles: self.has_cycles(),
            max_dependencies,
            max_dependents,
        }
    }
}
