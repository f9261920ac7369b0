use anyhow::{bail, Context, Result};
use scm_push::report::render_validation_text;
use scm_push::resolver::validate_dependencies;
use scm_push::tree::ConfigTree;

use crate::cli::{OutputFormat, ValidateArgs};

pub fn run_validate(args: ValidateArgs) -> Result<()> {
    let tree = ConfigTree::parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let report = validate_dependencies(&tree);

    match args.format {
        OutputFormat::Text => println!("{}", render_validation_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if !report.missing_dependencies.is_empty() {
        bail!(
            "validation failed: {} item(s) with unresolved dependencies",
            report.missing_dependencies.len()
        );
    }
    if args.strict && report.has_cycles {
        bail!("validation failed in strict mode: dependency cycle detected");
    }
    Ok(())
}
