//! Configuration and path resolution for the CLI.
//!
//! Pipeline settings come from three layers, later layers winning:
//! 1. Built-in defaults (`PipelineConfig::default()`)
//! 2. An optional JSON file (`--config`)
//! 3. Individual command-line flags

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tocalign_core::pipeline::PipelineConfig;

/// Flag values that override the pipeline configuration when present.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub upper_threshold: Option<f64>,
    pub lower_threshold: Option<f64>,
    pub seed: Option<u64>,
    pub iterative: bool,
}

impl Overrides {
    /// Applies the flags that were given.
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(threshold) = self.upper_threshold {
            config.upper_threshold = threshold;
        }
        if let Some(threshold) = self.lower_threshold {
            config.lower_threshold = threshold;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        // A flag can only switch iterative mode on.
        if self.iterative {
            config.iterative = true;
        }
    }
}

/// Reads the pipeline configuration, falling back to defaults without a file.
pub fn load_pipeline_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Returns the data directory for exports.
///
/// - macOS: `~/Library/Application Support/dev.tocalign.tocalign/`
/// - Linux: `~/.local/share/tocalign/`
/// - Windows: `%APPDATA%\tocalign\tocalign\data\`
pub fn get_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("dev", "tocalign", "tocalign")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| anyhow!("Could not determine data directory"))
}

/// Resolves where an export is written.
///
/// Paths with a directory component are used as given. A bare file name is
/// placed in the data directory, which is created if needed.
pub fn resolve_export_path(path: &Path) -> Result<PathBuf> {
    let has_dir = path
        .parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty());
    if has_dir || path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    Ok(data_dir.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = load_pipeline_config(None).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"lower_threshold": 0.25, "tfidf_extractors": ["concepts"]}}"#).unwrap();

        let config = load_pipeline_config(Some(file.path())).unwrap();
        assert_eq!(config.lower_threshold, 0.25);
        assert_eq!(config.tfidf_extractors, vec!["concepts".to_string()]);
        assert_eq!(config.upper_threshold, PipelineConfig::default().upper_threshold);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(load_pipeline_config(Some(file.path())).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = PipelineConfig {
            iterative: true,
            ..PipelineConfig::default()
        };
        Overrides {
            upper_threshold: Some(0.9),
            seed: Some(7),
            ..Overrides::default()
        }
        .apply(&mut config);

        assert_eq!(config.upper_threshold, 0.9);
        assert_eq!(config.seed, 7);
        assert_eq!(config.lower_threshold, PipelineConfig::default().lower_threshold);
        assert!(config.iterative, "absent flag keeps the file setting");
    }

    #[test]
    fn test_export_path_with_directory_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        assert_eq!(resolve_export_path(&path).unwrap(), path);

        let relative = Path::new("results/out.jsonl");
        assert_eq!(resolve_export_path(relative).unwrap(), relative);
    }
}
