use colored::Colorize;

use crate::conflicts::ConflictReport;
use crate::push::PushReport;
use crate::resolver::{DependencyReport, ValidationReport};

/// Render a validation report for terminal output.
pub fn render_validation_text(report: &ValidationReport) -> String {
    let mut out = Vec::new();

    let verdict = if report.valid {
        "valid".green().to_string()
    } else {
        "invalid".red().to_string()
    };
    out.push(format!(
        "validation: {verdict} nodes={} dependencies={}",
        report.total_nodes, report.total_dependencies
    ));
    if report.has_cycles {
        out.push("cycles detected".yellow().to_string());
    }
    if !report.missing_dependencies.is_empty() {
        out.push("missing_dependencies".to_string());
        for (item, targets) in &report.missing_dependencies {
            out.push(format!("- {}: {}", item, targets.join(", ")));
        }
    }

    out.push("nodes_by_kind".to_string());
    for (kind, count) in &report.statistics.nodes_by_kind {
        out.push(format!("- {kind}: {count}"));
    }

    out.join("\n")
}

/// Render a push order as one line per item.
pub fn render_order_text(order: &[String]) -> String {
    let mut out = Vec::new();
    out.push(format!("push_order ({} items)", order.len()));
    for (index, id) in order.iter().enumerate() {
        out.push(format!("{:>4}. {}", index + 1, id));
    }
    out.join("\n")
}

/// Render a full dependency report for terminal output.
pub fn render_dependency_report_text(report: &DependencyReport) -> String {
    let mut out = Vec::new();
    out.push(render_validation_text(&report.validation));
    out.push(String::new());

    out.push("dependencies_by_type".to_string());
    for (edge, count) in &report.dependencies_by_type {
        out.push(format!("- {edge}: {count}"));
    }
    if !report.informational_refs.is_empty() {
        out.push(String::new());
        out.push("informational_refs (not ordered)".to_string());
        for reference in &report.informational_refs {
            out.push(format!("- {reference}"));
        }
    }
    out.push(String::new());
    out.push(render_order_text(&report.resolution_order));

    out.join("\n")
}

/// Render a conflict report for terminal output.
pub fn render_conflicts_text(report: &ConflictReport) -> String {
    if !report.has_conflicts {
        return "no conflicts".green().to_string();
    }

    let mut out = Vec::new();
    out.push(
        format!("{} conflict(s) on target", report.conflict_count)
            .red()
            .to_string(),
    );
    for conflict in &report.conflicts {
        out.push(format!(
            "- {} '{}' already exists in {}",
            conflict.kind.as_str(),
            conflict.name,
            conflict.location
        ));
    }
    out.push("by_kind".to_string());
    for (kind, count) in &report.by_kind {
        out.push(format!("- {kind}: {count}"));
    }

    out.join("\n")
}

/// Render a push outcome for terminal output.
pub fn render_push_text(report: &PushReport) -> String {
    let mut out = Vec::new();

    let headline = if report.success {
        report.message.green().to_string()
    } else {
        report.message.red().to_string()
    };
    out.push(headline);
    if report.dry_run {
        out.push("dry run: no changes were written".cyan().to_string());
    }

    out.push(format!(
        "counts: folders={} snippets={} objects={} profiles={} rules={} infrastructure={}",
        report.folders_pushed,
        report.snippets_pushed,
        report.objects_pushed,
        report.profiles_pushed,
        report.rules_pushed,
        report.infrastructure_pushed
    ));
    out.push(format!(
        "conflicts: detected={} resolved={}",
        report.conflicts_detected, report.conflicts_resolved
    ));

    if !report.warnings.is_empty() {
        out.push("warnings".to_string());
        for warning in &report.warnings {
            out.push(format!("- {warning}").yellow().to_string());
        }
    }
    if !report.errors.is_empty() {
        out.push("errors".to_string());
        for error in &report.errors {
            out.push(
                format!("- {} '{}': {}", error.category, error.name, error.message)
                    .red()
                    .to_string(),
            );
        }
    }
    out.push(format!("elapsed: {}ms", report.elapsed_ms));

    out.join("\n")
}
