//! Naming-conflict detection against a destination tenant.
//!
//! A conflict is a same-category, same-name, same-location collision between
//! a source item being pushed and an item already present in the
//! destination. Lookup failures while checking a single category are
//! swallowed — detection is best-effort, and a real push attempt surfaces
//! the true state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::{ItemKind, Location};
use crate::tree::ConfigTree;

/// Errors a destination lookup can produce.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("target query failed: {0}")]
    Backend(String),
}

/// Read access to the destination tenant, one category at a time.
///
/// Implementations must tolerate categories with zero items. The live HTTP
/// client implements this elsewhere; [`SnapshotTarget`] backs it with an
/// exported snapshot for offline runs and tests.
pub trait TargetQuery {
    fn list_names(&self, kind: ItemKind, location: &Location) -> Result<Vec<String>, QueryError>;

    /// Locations known to exist on the destination.
    fn location_names(&self) -> Vec<String>;
}

/// A [`TargetQuery`] backed by a destination snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotTarget {
    index: BTreeMap<(String, Location), Vec<String>>,
    locations: Vec<String>,
}

impl SnapshotTarget {
    pub fn new(tree: &ConfigTree) -> Self {
        let mut index: BTreeMap<(String, Location), Vec<String>> = BTreeMap::new();
        for item in tree.items() {
            index
                .entry((item.kind.as_str().to_string(), item.location.clone()))
                .or_default()
                .push(item.name);
        }
        let locations = tree
            .locations()
            .into_iter()
            .map(|location| location.name().to_string())
            .collect();
        Self { index, locations }
    }
}

impl TargetQuery for SnapshotTarget {
    fn list_names(&self, kind: ItemKind, location: &Location) -> Result<Vec<String>, QueryError> {
        Ok(self
            .index
            .get(&(kind.as_str().to_string(), location.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn location_names(&self) -> Vec<String> {
        self.locations.clone()
    }
}

/// How a detected conflict should be resolved during a push.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStrategy {
    /// Do not push conflicting items (abort the run before any writes).
    #[default]
    Skip,
    /// Push conflicting items as updates over the existing ones.
    Overwrite,
    /// Push conflicting items under a suffixed name.
    Rename,
    /// Reserved; not implemented.
    Merge,
}

/// One detected collision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub kind: ItemKind,
    pub name: String,
    pub location: Location,
    /// Collision classification; currently always `existing_item`.
    pub conflict_kind: String,
}

impl Conflict {
    pub fn id(&self) -> String {
        format!("{}:{}:{}", self.kind.as_str(), self.location.name(), self.name)
    }
}

/// Result of one detection run. Transient — never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    pub has_conflicts: bool,
    pub conflict_count: usize,
    pub conflicts: Vec<Conflict>,
    pub by_kind: BTreeMap<String, usize>,
}

/// Compare a source snapshot against the destination and report collisions.
///
/// `location_filter` restricts the scan to one folder/snippet name.
pub fn detect_conflicts(
    source: &ConfigTree,
    target: &dyn TargetQuery,
    location_filter: Option<&str>,
) -> ConflictReport {
    let mut conflicts = Vec::new();
    for item in source.items() {
        if item.kind == ItemKind::Snippet {
            continue;
        }
        if let Some(filter) = location_filter {
            if item.location.name() != filter {
                continue;
            }
        }
        // Best-effort: a failed lookup means "no conflict detected here".
        let Ok(existing) = target.list_names(item.kind, &item.location) else {
            continue;
        };
        if existing.iter().any(|name| name == &item.name) {
            conflicts.push(Conflict {
                kind: item.kind,
                name: item.name,
                location: item.location,
                conflict_kind: "existing_item".to_string(),
            });
        }
    }

    let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
    for conflict in &conflicts {
        *by_kind.entry(conflict.kind.as_str().to_string()).or_insert(0) += 1;
    }

    ConflictReport {
        has_conflicts: !conflicts.is_empty(),
        conflict_count: conflicts.len(),
        conflicts,
        by_kind,
    }
}

/// A detection result paired with resolution strategies: one global default
/// plus optional per-conflict overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictPlan {
    pub report: ConflictReport,
    pub default_strategy: ConflictStrategy,
    /// Conflict id -> strategy, for conflicts resolved differently from the
    /// default.
    pub overrides: BTreeMap<String, ConflictStrategy>,
}

impl ConflictPlan {
    pub fn new(report: ConflictReport, default_strategy: ConflictStrategy) -> Self {
        Self {
            report,
            default_strategy,
            overrides: BTreeMap::new(),
        }
    }

    pub fn set_strategy(&mut self, conflict_id: &str, strategy: ConflictStrategy) {
        self.overrides.insert(conflict_id.to_string(), strategy);
    }

    pub fn strategy_for(&self, conflict_id: &str) -> ConflictStrategy {
        self.overrides
            .get(conflict_id)
            .copied()
            .unwrap_or(self.default_strategy)
    }

    /// The effective strategy per conflict id, as reports expose it.
    pub fn resolution_strategies(&self) -> BTreeMap<String, ConflictStrategy> {
        self.report
            .conflicts
            .iter()
            .map(|conflict| {
                let id = conflict.id();
                let strategy = self.strategy_for(&id);
                (id, strategy)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{
        detect_conflicts, ConflictPlan, ConflictStrategy, QueryError, SnapshotTarget, TargetQuery,
    };
    use crate::item::{ItemKind, Location};
    use crate::tree::ConfigTree;

    fn source_with_web1() -> ConfigTree {
        ConfigTree::from_value(json!({
            "folders": [{
                "name": "Shared",
                "addresses": [{"name": "web1", "ip_netmask": "10.0.0.1/32"}]
            }]
        }))
        .expect("tree")
    }

    #[test]
    fn same_name_same_location_is_a_conflict() {
        let source = source_with_web1();
        let target_tree = source_with_web1();
        let target = SnapshotTarget::new(&target_tree);

        let report = detect_conflicts(&source, &target, None);
        assert!(report.has_conflicts);
        assert_eq!(report.conflict_count, 1);
        assert_eq!(report.conflicts[0].kind, ItemKind::AddressObject);
        assert_eq!(report.conflicts[0].name, "web1");
        assert_eq!(report.by_kind.get("address_object"), Some(&1));
    }

    #[test]
    fn different_location_is_not_a_conflict() {
        let source = source_with_web1();
        let target_tree = ConfigTree::from_value(json!({
            "folders": [{
                "name": "Branch",
                "addresses": [{"name": "web1"}]
            }]
        }))
        .expect("tree");
        let target = SnapshotTarget::new(&target_tree);

        let report = detect_conflicts(&source, &target, None);
        assert!(!report.has_conflicts);
    }

    #[test]
    fn location_filter_scopes_the_scan() {
        let source = source_with_web1();
        let target = SnapshotTarget::new(&source_with_web1());

        let report = detect_conflicts(&source, &target, Some("Branch"));
        assert!(!report.has_conflicts);
    }

    #[test]
    fn lookup_failures_are_swallowed() {
        struct FailingTarget;
        impl TargetQuery for FailingTarget {
            fn list_names(
                &self,
                _kind: ItemKind,
                _location: &Location,
            ) -> Result<Vec<String>, QueryError> {
                Err(QueryError::Backend("boom".to_string()))
            }
            fn location_names(&self) -> Vec<String> {
                Vec::new()
            }
        }

        let report = detect_conflicts(&source_with_web1(), &FailingTarget, None);
        assert!(!report.has_conflicts);
    }

    #[test]
    fn plan_applies_per_conflict_overrides() {
        let source = source_with_web1();
        let target = SnapshotTarget::new(&source_with_web1());
        let report = detect_conflicts(&source, &target, None);
        let id = report.conflicts[0].id();

        let mut plan = ConflictPlan::new(report, ConflictStrategy::Skip);
        assert_eq!(plan.strategy_for(&id), ConflictStrategy::Skip);

        plan.set_strategy(&id, ConflictStrategy::Overwrite);
        assert_eq!(plan.strategy_for(&id), ConflictStrategy::Overwrite);
        assert_eq!(
            plan.resolution_strategies().get(&id),
            Some(&ConflictStrategy::Overwrite)
        );
    }
}
