use std::fs;

use anyhow::{bail, Context, Result};
use scm_push::conflicts::{ConflictStrategy, SnapshotTarget};
use scm_push::push::{push_configuration, PushOptions, RecordingClient};
use scm_push::report::render_push_text;
use scm_push::settings::{load_settings, PushSettings};
use scm_push::tree::ConfigTree;

use crate::cli::{OutputFormat, PushArgs, Strategy};
use crate::path_guard;

pub fn run_push(args: PushArgs) -> Result<()> {
    let source = ConfigTree::parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let target_tree = ConfigTree::parse_file(&args.target)
        .with_context(|| format!("failed to parse {}", args.target.display()))?;

    let settings = match &args.settings {
        Some(path) => load_settings(path)
            .with_context(|| format!("failed to load settings {}", path.display()))?,
        None => PushSettings::default(),
    };
    let strategy = args
        .strategy
        .map(strategy_name)
        .unwrap_or(settings.default_strategy);

    let target = SnapshotTarget::new(&target_tree);
    let mut client = RecordingClient::with_target_folders(target_tree.folder_names());
    let options = PushOptions {
        dry_run: args.dry_run,
        strategy,
        location: args.location.clone(),
    };

    let report = push_configuration(&source, &target, &mut client, &options)?;

    if let Some(out_path) = &args.output {
        path_guard::ensure_output_not_same(out_path, &[&args.file, &args.target])?;
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(out_path, json)
            .with_context(|| format!("failed to write report file {}", out_path.display()))?;
    }

    match args.format {
        OutputFormat::Text => println!("{}", render_push_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if !report.success {
        bail!("push failed: {}", report.message);
    }
    Ok(())
}

fn strategy_name(strategy: Strategy) -> ConflictStrategy {
    match strategy {
        Strategy::Skip => ConflictStrategy::Skip,
        Strategy::Overwrite => ConflictStrategy::Overwrite,
        Strategy::Rename => ConflictStrategy::Rename,
    }
}
