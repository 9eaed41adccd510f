//! Search configuration
//!
//! Read from `--config <path>`, or from the per-user config directory when
//! present. Every field falls back to its default when missing.

use crate::search::filters::FilterPolicy;
use crate::search::fuzzy::DEFAULT_THRESHOLD;
use crate::search::ranking::ScoringWeights;
use crate::search::similarity::Similarity;
use crate::search::suggest::MIN_INPUT_CHARS;
use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tunable search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of distinct contracts considered in fuzzy mode
    pub fuzzy_limit: usize,
    /// Fuzzy matches must score strictly above this (0-100)
    pub fuzzy_threshold: Similarity,
    /// Maximum number of suggestions returned
    pub suggestion_limit: usize,
    /// Shortest input, in characters, that produces suggestions
    pub min_suggestion_chars: usize,
    /// Queries remembered by an interactive session
    pub history_capacity: usize,
    pub weights: ScoringWeights,
    pub prefilter: FilterPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy_limit: 50,
            fuzzy_threshold: DEFAULT_THRESHOLD,
            suggestion_limit: 5,
            min_suggestion_chars: MIN_INPUT_CHARS,
            history_capacity: 10,
            weights: ScoringWeights::default(),
            prefilter: FilterPolicy::default(),
        }
    }
}

/// Get the path to the per-user configuration file
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
    Ok(config_dir.join("contract-search").join("config.json"))
}

/// Load configuration
///
/// An explicit path must exist. The per-user file is optional and defaults
/// are used when it is missing.
pub fn load_config(explicit: Option<&Path>) -> Result<SearchConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = config_path()?;
            if !path.exists() {
                debug!("No config at {}, using defaults", path.display());
                return Ok(SearchConfig::default());
            }
            path
        }
    };

    let data = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: SearchConfig = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// JSON schema of the configuration file
pub fn config_schema() -> Result<String> {
    let schema = schemars::schema_for!(SearchConfig);
    serde_json::to_string_pretty(&schema).context("Failed to serialize config schema")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.fuzzy_limit, 50);
        assert_eq!(config.fuzzy_threshold, 50);
        assert_eq!(config.suggestion_limit, 5);
        assert_eq!(config.min_suggestion_chars, 2);
        assert_eq!(config.history_capacity, 10);
        assert!(config.prefilter.status);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"fuzzy_threshold": 70, "weights": {{"agency": 10}}, "prefilter": {{"month": false}}}}"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.fuzzy_threshold, 70);
        assert_eq!(config.fuzzy_limit, 50);
        assert_eq!(config.weights.agency, 10.0);
        assert_eq!(config.weights.status, 50.0);
        assert!(!config.prefilter.month);
        assert!(config.prefilter.agency);
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_malformed_file_fails() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_path_file_name() {
        if let Ok(path) = config_path() {
            assert!(path.ends_with("contract-search/config.json"));
        }
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = config_schema().unwrap();
        assert!(schema.contains("fuzzy_threshold"));
        assert!(schema.contains("prefilter"));
    }
}
