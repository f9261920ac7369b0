//! Dependency resolution over a tenant snapshot.
//!
//! Every entry point takes explicit values and builds a fresh graph per
//! call — there is no cached graph state, so concurrent callers share
//! nothing.

use std::collections::{BTreeMap, BTreeSet};

use dep_graph_core::{DependencyGraph, GraphStatistics};
use serde::Serialize;

use crate::extract::extract_references;
use crate::item::{ConfigItem, ItemKind};
use crate::tree::ConfigTree;

/// Iteration ceiling for the transitive dependency search, guarding against
/// cycles and non-convergence. Overridable via settings.
pub const DEFAULT_MAX_DEPENDENCY_PASSES: usize = 10;

/// Outcome of validating a snapshot's dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub total_nodes: usize,
    pub total_dependencies: usize,
    pub has_cycles: bool,
    /// Node id -> dependency names with no real definition in the snapshot.
    pub missing_dependencies: BTreeMap<String, Vec<String>>,
    pub statistics: GraphStatistics,
}

/// Aggregate dependency view for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    pub validation: ValidationReport,
    /// Edge counts grouped by `"{from_kind} -> {to_kind}"`.
    pub dependencies_by_type: BTreeMap<String, usize>,
    pub resolution_order: Vec<String>,
    /// References tracked for data integrity but excluded from the edge set
    /// (url-filtering profile-group members).
    pub informational_refs: Vec<String>,
}

/// Build the dependency graph for a full snapshot.
pub fn build_dependency_graph(tree: &ConfigTree) -> DependencyGraph {
    build_graph_from_items(&tree.items())
}

/// Build a dependency graph from an explicit item set.
///
/// Each item registers as a real node (payload = its own data); its declared
/// references become edges, auto-creating placeholders for targets whose
/// definitions are not in the set.
pub fn build_graph_from_items(items: &[ConfigItem]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for item in items {
        graph.add_node(&item.name, Some(item.kind.as_str()), Some(item.data.clone()));
        for reference in extract_references(item.kind, &item.data).edges {
            graph.add_dependency(
                &item.name,
                &reference.target_name,
                Some(item.kind.as_str()),
                reference.target_kind.map(ItemKind::as_str),
            );
        }
    }
    graph
}

/// Validate a snapshot: every declared reference must resolve to a real
/// definition and the graph must be acyclic.
pub fn validate_dependencies(tree: &ConfigTree) -> ValidationReport {
    validate_graph(&build_dependency_graph(tree))
}

/// Validate an already-built graph.
///
/// Only real nodes count as available — a reference placeholder is exactly
/// the absence of a definition.
pub fn validate_graph(graph: &DependencyGraph) -> ValidationReport {
    let missing_dependencies = graph.find_missing_dependencies(&graph.real_ids());
    let statistics = graph.statistics();
    let has_cycles = statistics.has_cycles;
    ValidationReport {
        valid: missing_dependencies.is_empty() && !has_cycles,
        total_nodes: statistics.total_nodes,
        total_dependencies: statistics.total_edges,
        has_cycles,
        missing_dependencies,
        statistics,
    }
}

/// Order in which the snapshot's items can be processed, dependencies first.
pub fn resolution_order(tree: &ConfigTree) -> Vec<String> {
    build_dependency_graph(tree).topological_order()
}

/// Order in which items must be written during a push. Identical to
/// [`resolution_order`]; both names exist because pull and push flows ask
/// the same question.
pub fn push_order(tree: &ConfigTree) -> Vec<String> {
    resolution_order(tree)
}

/// Find the definitions a selection transitively needs, searching the full
/// snapshot, grouped by category tag.
///
/// Iterates up to `max_passes` times: validate the working set, look up
/// currently-missing names in the full snapshot, merge what was found, and
/// repeat until nothing new turns up. Supports "select three rules, pull in
/// everything they need" flows.
pub fn find_required_dependencies(
    selection: &[ConfigItem],
    full: &ConfigTree,
    max_passes: usize,
) -> BTreeMap<String, Vec<ConfigItem>> {
    let mut working: Vec<ConfigItem> = selection.to_vec();
    let mut required: BTreeMap<String, Vec<ConfigItem>> = BTreeMap::new();
    let full_items = full.items();

    for _ in 0..max_passes {
        let graph = build_graph_from_items(&working);
        let missing = graph.find_missing_dependencies(&graph.real_ids());
        if missing.is_empty() {
            break;
        }
        let wanted: BTreeSet<String> = missing.into_values().flatten().collect();
        let mut found_any = false;
        for name in wanted {
            if working.iter().any(|item| item.name == name) {
                continue;
            }
            // Definition lookup currently covers the infrastructure chain;
            // object/profile/rule lookup is a later extension.
            let Some(item) = full_items
                .iter()
                .find(|candidate| candidate.kind.is_infrastructure() && candidate.name == name)
            else {
                continue;
            };
            required
                .entry(item.kind.as_str().to_string())
                .or_default()
                .push(item.clone());
            working.push(item.clone());
            found_any = true;
        }
        if !found_any {
            break;
        }
    }
    required
}

/// Build the aggregate dependency report for a snapshot.
pub fn dependency_report(tree: &ConfigTree) -> DependencyReport {
    let items = tree.items();
    let graph = build_graph_from_items(&items);
    let validation = validate_graph(&graph);

    let mut dependencies_by_type: BTreeMap<String, usize> = BTreeMap::new();
    for (from, to) in graph.edges() {
        let from_kind = node_kind(&graph, from);
        let to_kind = node_kind(&graph, to);
        *dependencies_by_type
            .entry(format!("{from_kind} -> {to_kind}"))
            .or_insert(0) += 1;
    }

    let mut informational_refs = Vec::new();
    for item in &items {
        for reference in extract_references(item.kind, &item.data).informational {
            informational_refs.push(format!("{} -> {}", item.name, reference.target_name));
        }
    }

    DependencyReport {
        resolution_order: graph.topological_order(),
        validation,
        dependencies_by_type,
        informational_refs,
    }
}

fn node_kind<'a>(graph: &'a DependencyGraph, id: &str) -> &'a str {
    graph
        .node(id)
        .and_then(|node| node.kind.as_deref())
        .unwrap_or("unknown")
}
