//! Gate thresholds and their optional per-project override.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Override filename inside the session state directory.
pub const CONFIG_FILE_NAME: &str = "gate.toml";

/// Immutable per-invocation gate thresholds.
///
/// Defaults are compiled in; a `.planwarden/gate.toml` under the project
/// root may override individual fields. A missing or malformed override
/// falls back to the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Review rounds after which an unapproved plan may proceed with a
    /// warning.
    pub max_review_rounds: u32,
    /// Plans shorter than this (trimmed line count) skip review.
    pub min_lines_for_review: usize,
    /// Inline marker that waives review entirely.
    pub bypass_marker: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            max_review_rounds: 3,
            min_lines_for_review: 50,
            bypass_marker: "<!-- QUICK -->".to_string(),
        }
    }
}

impl GateConfig {
    pub fn load(root: &Path) -> GateConfig {
        let path = root
            .join(crate::core::session::SESSION_DIR_NAME)
            .join(CONFIG_FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(raw) => toml::from_str(&raw).unwrap_or_default(),
            Err(_) => GateConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_override_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(GateConfig::load(tmp.path()), GateConfig::default());
    }

    #[test]
    fn override_file_changes_individual_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(crate::core::session::SESSION_DIR_NAME);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE_NAME), "max_review_rounds = 5\n").unwrap();

        let config = GateConfig::load(tmp.path());
        assert_eq!(config.max_review_rounds, 5);
        assert_eq!(config.min_lines_for_review, 50);
    }

    #[test]
    fn malformed_override_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(crate::core::session::SESSION_DIR_NAME);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE_NAME), "max_review_rounds = \"lots\"").unwrap();

        assert_eq!(GateConfig::load(tmp.path()), GateConfig::default());
    }
}
