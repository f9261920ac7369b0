use anyhow::{bail, Context, Result};
use clap::Parser;
use scm_push::conflicts::{detect_conflicts, SnapshotTarget};
use scm_push::report::{render_conflicts_text, render_dependency_report_text, render_order_text};
use scm_push::resolver::{dependency_report, push_order};
use scm_push::tree::ConfigTree;

mod cli;
mod path_guard;
mod push_cmd;
mod validate_cmd;

use cli::{Cli, Command, ConflictsArgs, OrderArgs, OutputFormat, ReportArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate(args) => validate_cmd::run_validate(args),
        Command::Order(args) => run_order(args),
        Command::Report(args) => run_report(args),
        Command::Conflicts(args) => run_conflicts(args),
        Command::Push(args) => push_cmd::run_push(args),
    }
}

fn run_order(args: OrderArgs) -> Result<()> {
    let tree = ConfigTree::parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let order = push_order(&tree);

    match args.format {
        OutputFormat::Text => println!("{}", render_order_text(&order)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&order)?),
    }
    Ok(())
}

fn run_report(args: ReportArgs) -> Result<()> {
    let tree = ConfigTree::parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let report = dependency_report(&tree);

    match args.format {
        OutputFormat::Text => println!("{}", render_dependency_report_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn run_conflicts(args: ConflictsArgs) -> Result<()> {
    let source = ConfigTree::parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let target_tree = ConfigTree::parse_file(&args.target)
        .with_context(|| format!("failed to parse {}", args.target.display()))?;
    let target = SnapshotTarget::new(&target_tree);

    let report = detect_conflicts(&source, &target, args.location.as_deref());

    match args.format {
        OutputFormat::Text => println!("{}", render_conflicts_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if args.strict && report.has_conflicts {
        bail!("{} conflict(s) found", report.conflict_count);
    }
    Ok(())
}
