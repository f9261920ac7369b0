use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::conflicts::ConflictStrategy;
use crate::resolver::DEFAULT_MAX_DEPENDENCY_PASSES;

/// Tunables loaded from an optional TOML file. Every field has a default so
/// a partial (or absent) file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PushSettings {
    /// Ceiling on expansion passes when closing a selection over its
    /// dependencies.
    pub max_dependency_passes: usize,
    /// Strategy applied to conflicts when the command line does not pick one.
    pub default_strategy: ConflictStrategy,
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            max_dependency_passes: DEFAULT_MAX_DEPENDENCY_PASSES,
            default_strategy: ConflictStrategy::default(),
        }
    }
}

/// Errors returned when loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsLoadError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<PushSettings, SettingsLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| SettingsLoadError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{load_settings, PushSettings};
    use crate::conflicts::ConflictStrategy;

    #[test]
    fn defaults_match_the_documented_values() {
        let settings = PushSettings::default();
        assert_eq!(settings.max_dependency_passes, 10);
        assert_eq!(settings.default_strategy, ConflictStrategy::Skip);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "default_strategy = \"overwrite\"\n").expect("write");

        let settings = load_settings(&path).expect("load");
        assert_eq!(settings.default_strategy, ConflictStrategy::Overwrite);
        assert_eq!(settings.max_dependency_passes, 10);
    }

    #[test]
    fn unreadable_file_reports_the_path() {
        let err = load_settings(std::path::Path::new("/nonexistent/settings.toml"))
            .expect_err("should fail");
        assert!(err.to_string().contains("/nonexistent/settings.toml"));
    }
}
