use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "scm-push")]
#[command(about = "Resolve dependencies and push SCM configuration snapshots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Validate dependency references in one snapshot.
    Validate(ValidateArgs),
    /// Print the dependency-safe push order for one snapshot.
    Order(OrderArgs),
    /// Full dependency report: validation, edge counts, push order.
    Report(ReportArgs),
    /// Detect naming conflicts between a snapshot and a target snapshot.
    Conflicts(ConflictsArgs),
    /// Push a snapshot toward a target, dependencies first.
    Push(PushArgs),
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Snapshot file to validate.
    pub file: PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Treat dependency cycles as failures even when nothing is missing.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct OrderArgs {
    /// Snapshot file to order.
    pub file: PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Snapshot file to report on.
    pub file: PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ConflictsArgs {
    /// Source snapshot file.
    pub file: PathBuf,
    /// Target tenant snapshot file.
    pub target: PathBuf,
    /// Restrict the scan to one folder or snippet name.
    #[arg(long)]
    pub location: Option<String>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Exit with an error when conflicts are found.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum Strategy {
    Skip,
    Overwrite,
    Rename,
}

#[derive(Parser, Debug)]
pub struct PushArgs {
    /// Source snapshot file.
    pub file: PathBuf,
    /// Target tenant snapshot file.
    pub target: PathBuf,
    /// Restrict the push to one folder or snippet name.
    #[arg(long)]
    pub location: Option<String>,
    /// Conflict resolution strategy (defaults to the settings file, then skip).
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,
    /// Validate and detect conflicts without writing anything.
    #[arg(long)]
    pub dry_run: bool,
    /// Optional settings TOML file.
    #[arg(long)]
    pub settings: Option<PathBuf>,
    /// Write the push report as JSON to this path.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
