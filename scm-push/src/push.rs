//! Push orchestration.
//!
//! A push run is a linear pipeline:
//!
//! 1. **Validate** — source shape, dependency validation, permission probe,
//!    best-effort folder-existence checks (warnings only)
//! 2. **Detect conflicts** — scoped to the locations being pushed
//! 3. **Conflict decision** — conflicts under the skip strategy abort the
//!    run before any write
//! 4. **Dry-run short-circuit** — return validation + conflicts, no writes
//! 5. **Compute push order** — topological order over the full snapshot
//! 6. **Execute** — folders then snippets; within each, items follow
//!    dependency order; item failures are recorded and the batch continues
//! 7. **Report** — per-category counts, errors, warnings, elapsed time
//!
//! The only failures that propagate as errors are fatal ones: an unusable
//! source snapshot or a failed permission probe. Everything else degrades to
//! structured report data. Retry/backoff belongs to the client collaborator,
//! not here.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use thiserror::Error;

use crate::conflicts::{detect_conflicts, ConflictReport, ConflictStrategy, TargetQuery};
use crate::item::{ConfigItem, Location, StatBucket};
use crate::resolver::{push_order, validate_dependencies, ValidationReport};
use crate::tree::ConfigTree;

/// Failure of a single client call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PushItemError(pub String);

/// The write collaborator: creates/updates one item at a time against the
/// destination tenant. The HTTP implementation lives with the API layer;
/// [`RecordingClient`] stands in for offline runs and tests.
pub trait PushClient {
    /// Lightweight read proving the destination is reachable and the
    /// credentials can see it. Runs before any write.
    fn probe(&self) -> Result<(), PushItemError>;

    /// Whether a folder already exists on the destination.
    fn folder_exists(&self, name: &str) -> Result<bool, PushItemError>;

    /// Create or update one item. `overwrite` is set when a conflict is
    /// being resolved with [`ConflictStrategy::Overwrite`].
    fn push_item(&mut self, item: &ConfigItem, overwrite: bool) -> Result<(), PushItemError>;
}

#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    /// Stop after validation and conflict detection; write nothing.
    pub dry_run: bool,
    pub strategy: ConflictStrategy,
    /// Restrict the push to one folder/snippet name.
    pub location: Option<String>,
}

/// One recorded item-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushError {
    pub category: String,
    pub name: String,
    pub message: String,
}

/// Aggregated outcome of a push run. Always produced, even on failure; the
/// only way to get no report is a fatal error in stage 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushReport {
    pub success: bool,
    pub message: String,
    pub dry_run: bool,
    pub folders_pushed: usize,
    pub snippets_pushed: usize,
    pub objects_pushed: usize,
    pub profiles_pushed: usize,
    pub rules_pushed: usize,
    pub infrastructure_pushed: usize,
    pub conflicts_detected: usize,
    pub conflicts_resolved: usize,
    pub errors: Vec<PushError>,
    pub warnings: Vec<String>,
    pub elapsed_ms: u128,
    pub validation: ValidationReport,
    pub conflicts: ConflictReport,
}

/// Execute a push run against the destination.
///
/// # Errors
///
/// Returns an error only for the fatal class: a source snapshot with nothing
/// to push, or a failed permission probe. Dependency problems, conflicts,
/// and item-level write failures come back inside the report.
pub fn push_configuration(
    tree: &ConfigTree,
    target: &dyn TargetQuery,
    client: &mut dyn PushClient,
    options: &PushOptions,
) -> Result<PushReport> {
    let started = Instant::now();

    // Stage 1: validate.
    if tree.folder_names().is_empty() && tree.snippet_names().is_empty() {
        bail!("source snapshot has no folders or snippets to push");
    }
    let validation = validate_dependencies(tree);
    let mut warnings = Vec::new();
    if !validation.missing_dependencies.is_empty() {
        warnings.push(format!(
            "{} item(s) have unresolved dependencies; their pushes may fail",
            validation.missing_dependencies.len()
        ));
    }
    if validation.has_cycles {
        warnings.push(
            "dependency cycle detected; push order is best-effort for the affected items"
                .to_string(),
        );
    }
    client
        .probe()
        .context("permission probe against target failed")?;
    let in_scope = |name: &str| options.location.as_deref().map_or(true, |l| l == name);
    for folder in tree.folder_names().iter().filter(|name| in_scope(name)) {
        match client.folder_exists(folder) {
            Ok(true) => {}
            Ok(false) => warnings.push(format!(
                "folder '{folder}' does not exist on target and will be created"
            )),
            Err(err) => warnings.push(format!("could not check folder '{folder}': {err}")),
        }
    }

    // Stage 2: detect conflicts.
    let conflicts = detect_conflicts(tree, target, options.location.as_deref());

    let report = |success: bool, message: String, outcome: ExecutionOutcome| PushReport {
        success,
        message,
        dry_run: options.dry_run,
        folders_pushed: outcome.folders.len(),
        snippets_pushed: outcome.snippets_pushed,
        objects_pushed: outcome.objects_pushed,
        profiles_pushed: outcome.profiles_pushed,
        rules_pushed: outcome.rules_pushed,
        infrastructure_pushed: outcome.infrastructure_pushed,
        conflicts_detected: conflicts.conflict_count,
        conflicts_resolved: outcome.conflicts_resolved,
        errors: outcome.errors,
        warnings: warnings.clone(),
        elapsed_ms: started.elapsed().as_millis(),
        validation: validation.clone(),
        conflicts: conflicts.clone(),
    };

    // Stage 3: conflict decision.
    if conflicts.has_conflicts {
        match options.strategy {
            ConflictStrategy::Skip => {
                return Ok(report(
                    false,
                    format!(
                        "push aborted: {} naming conflict(s) on target; resolve them or choose another strategy",
                        conflicts.conflict_count
                    ),
                    ExecutionOutcome::default(),
                ));
            }
            ConflictStrategy::Merge => {
                return Ok(report(
                    false,
                    "push aborted: merge strategy is reserved and not yet implemented".to_string(),
                    ExecutionOutcome::default(),
                ));
            }
            ConflictStrategy::Overwrite | ConflictStrategy::Rename => {}
        }
    }

    // Stage 4: dry-run short-circuit.
    if options.dry_run {
        return Ok(report(
            true,
            "dry run: validation and conflict detection only, nothing written".to_string(),
            ExecutionOutcome::default(),
        ));
    }

    // Stage 5: compute push order over the full snapshot.
    let rank: BTreeMap<String, usize> = push_order(tree)
        .into_iter()
        .enumerate()
        .map(|(index, id)| (id, index))
        .collect();

    // Stage 6: execute, folders before snippets, dependency order within.
    let conflict_ids: BTreeSet<String> = conflicts.conflicts.iter().map(|c| c.id()).collect();
    let mut items: Vec<ConfigItem> = tree
        .items()
        .into_iter()
        .filter(|item| in_scope(item.location.name()))
        .collect();
    items.sort_by_key(|item| {
        let batch = match item.location {
            Location::Folder(_) => 0usize,
            Location::Snippet(_) => 1,
        };
        let order = rank.get(&item.name).copied().unwrap_or(usize::MAX);
        (batch, order)
    });

    let mut outcome = ExecutionOutcome::default();
    for item in items {
        let id = format!("{}:{}:{}", item.kind.as_str(), item.location.name(), item.name);
        let conflicting = conflict_ids.contains(&id);
        let mut overwrite = false;
        let mut item = item;
        if conflicting {
            match options.strategy {
                ConflictStrategy::Overwrite => {
                    overwrite = true;
                    outcome.conflicts_resolved += 1;
                }
                ConflictStrategy::Rename => {
                    item.name = format!("{}-1", item.name);
                    outcome.conflicts_resolved += 1;
                }
                ConflictStrategy::Skip | ConflictStrategy::Merge => {}
            }
        }
        match client.push_item(&item, overwrite) {
            Ok(()) => outcome.record_success(&item),
            Err(err) => outcome.errors.push(PushError {
                category: item.kind.as_str().to_string(),
                name: item.name.clone(),
                message: err.to_string(),
            }),
        }
    }

    // Stage 7: report.
    let success = outcome.errors.is_empty();
    let pushed = outcome.total_items();
    let message = if success {
        format!(
            "pushed {pushed} item(s) across {} folder(s) and {} snippet(s)",
            outcome.folders.len(),
            outcome.snippets_pushed
        )
    } else {
        format!(
            "push completed with {} error(s); {pushed} item(s) written",
            outcome.errors.len()
        )
    };
    Ok(report(success, message, outcome))
}

#[derive(Debug, Default, Clone)]
struct ExecutionOutcome {
    folders: BTreeSet<String>,
    snippets_pushed: usize,
    objects_pushed: usize,
    profiles_pushed: usize,
    rules_pushed: usize,
    infrastructure_pushed: usize,
    conflicts_resolved: usize,
    errors: Vec<PushError>,
}

impl ExecutionOutcome {
    fn record_success(&mut self, item: &ConfigItem) {
        if let Location::Folder(name) = &item.location {
            self.folders.insert(name.clone());
        }
        match item.kind.bucket() {
            StatBucket::Objects => self.objects_pushed += 1,
            StatBucket::Profiles => self.profiles_pushed += 1,
            StatBucket::Rules => self.rules_pushed += 1,
            StatBucket::Infrastructure => self.infrastructure_pushed += 1,
            StatBucket::Snippets => self.snippets_pushed += 1,
        }
    }

    fn total_items(&self) -> usize {
        self.objects_pushed
            + self.profiles_pushed
            + self.rules_pushed
            + self.infrastructure_pushed
            + self.snippets_pushed
    }
}

/// One write a [`RecordingClient`] accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushedItem {
    pub category: String,
    pub name: String,
    pub location: String,
    pub overwrite: bool,
}

/// In-memory [`PushClient`] that records accepted writes instead of calling
/// an API. Backs offline plan output in the CLI; tests use it to assert what
/// a run would have written and to inject item-level failures.
#[derive(Debug, Clone, Default)]
pub struct RecordingClient {
    target_folders: BTreeSet<String>,
    fail_names: BTreeSet<String>,
    pushed: Vec<PushedItem>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folder names that should report as existing on the destination.
    pub fn with_target_folders(folders: impl IntoIterator<Item = String>) -> Self {
        Self {
            target_folders: folders.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Make every push of the named item fail.
    pub fn fail_on(mut self, name: &str) -> Self {
        self.fail_names.insert(name.to_string());
        self
    }

    pub fn pushed(&self) -> &[PushedItem] {
        &self.pushed
    }
}

impl PushClient for RecordingClient {
    fn probe(&self) -> Result<(), PushItemError> {
        Ok(())
    }

    fn folder_exists(&self, name: &str) -> Result<bool, PushItemError> {
        Ok(self.target_folders.contains(name))
    }

    fn push_item(&mut self, item: &ConfigItem, overwrite: bool) -> Result<(), PushItemError> {
        if self.fail_names.contains(&item.name) {
            return Err(PushItemError(format!("simulated failure for '{}'", item.name)));
        }
        self.pushed.push(PushedItem {
            category: item.kind.as_str().to_string(),
            name: item.name.clone(),
            location: item.location.name().to_string(),
            overwrite,
        });
        Ok(())
    }
}
