use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse to write a report over one of the snapshot files it came from.
pub fn ensure_output_not_same(output: &Path, inputs: &[&Path]) -> Result<()> {
    let out_norm = normalize(output)
        .with_context(|| format!("failed to normalize output path {}", output.display()))?;

    for input in inputs {
        let in_norm = normalize(input)
            .with_context(|| format!("failed to normalize input path {}", input.display()))?;
        if out_norm == in_norm {
            bail!(
                "refusing to overwrite snapshot: output {} matches input {}",
                output.display(),
                input.display()
            );
        }
    }
    Ok(())
}

fn normalize(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // The output file usually does not exist yet, so canonicalize is not an
    // option. Best-effort join against cwd; `..` sequences are not resolved.
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir().context("current_dir")?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::ensure_output_not_same;

    #[test]
    fn output_matching_an_input_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("source.json");
        std::fs::write(&input, "{}").expect("write");

        let result = ensure_output_not_same(&input, &[&input]);
        assert!(result.is_err());
    }

    #[test]
    fn distinct_output_is_accepted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("source.json");
        std::fs::write(&input, "{}").expect("write");
        let output = dir.path().join("report.json");

        assert!(ensure_output_not_same(&output, &[&input]).is_ok());
    }
}
