// Run configuration
//
// Defaults mirror the constants the pipeline has always used: one pass,
// clips of at most one second are degenerate, up to ten speakers at a 0.5
// similarity threshold.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::clips::cleanup::CleanupOptions;
use crate::diarization::model_manager;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationConfig {
    /// Number of separate -> clean -> merge passes.
    pub passes: usize,
    /// Degenerate-clip window handed to cleanup after each separation.
    pub cleanup: CleanupOptions,
    /// Maximum number of speakers the engine tracks per pass.
    pub max_speakers: usize,
    /// Similarity threshold for speaker matching (0.0 to 1.0).
    pub similarity_threshold: f32,
    /// Overrides the per-user models directory when set.
    pub models_dir: Option<PathBuf>,
    /// Keep each pass's clip files instead of sweeping them after the merge.
    pub keep_intermediate: bool,
}

impl Default for IsolationConfig {
    fn default() -> Self {
        Self {
            passes: 1,
            cleanup: CleanupOptions::default(),
            max_speakers: 10,
            similarity_threshold: 0.5,
            models_dir: None,
            keep_intermediate: false,
        }
    }
}

impl IsolationConfig {
    /// Load a configuration from a JSON file. Absent fields keep their
    /// defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// The models directory this run should use.
    pub fn models_dir(&self) -> Result<PathBuf> {
        match &self.models_dir {
            Some(dir) => Ok(dir.clone()),
            None => model_manager::default_models_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_matches_historic_constants() {
        let config = IsolationConfig::default();

        assert_eq!(config.passes, 1);
        assert_eq!(config.cleanup.min_duration_secs, 0.0);
        assert_eq!(config.cleanup.max_duration_secs, 1.0);
        assert_eq!(config.max_speakers, 10);
        assert_eq!(config.similarity_threshold, 0.5);
        assert!(config.models_dir.is_none());
        assert!(!config.keep_intermediate);
    }

    #[test]
    fn partial_json_keeps_defaults_for_the_rest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"passes": 3, "models_dir": "/opt/models"}"#).unwrap();

        let config = IsolationConfig::from_file(&path).unwrap();

        assert_eq!(config.passes, 3);
        assert_eq!(config.models_dir.as_deref(), Some(Path::new("/opt/models")));
        assert_eq!(config.max_speakers, 10);
    }

    #[test]
    fn explicit_models_dir_wins() {
        let config = IsolationConfig {
            models_dir: Some(PathBuf::from("/opt/models")),
            ..Default::default()
        };

        assert_eq!(config.models_dir().unwrap(), PathBuf::from("/opt/models"));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(IsolationConfig::from_file(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(IsolationConfig::from_file(&dir.path().join("absent.json")).is_err());
    }
}
