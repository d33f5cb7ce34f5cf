//! Configuration file loading (`.dtsdown.toml` at the source root).

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::CONFIG_FILENAME;

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The main configuration section for dtsdown.
    pub dtsdown: DtsdownConfig,
    /// The path to the configuration file this was loaded from.
    /// `None` if defaults were used.
    #[serde(skip)]
    pub config_file_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Configuration options for dtsdown.
pub struct DtsdownConfig {
    /// Default target version when `--target` is not given on the command
    /// line (e.g. `"3.4"`).
    pub target: Option<String>,
    /// Extra folder names to skip while collecting declaration files.
    pub exclude_folders: Option<Vec<String>>,
}

impl Config {
    /// Loads configuration from `dir/.dtsdown.toml`, falling back to
    /// defaults when the file is absent. A malformed file produces a warning
    /// and defaults rather than an abort.
    #[must_use]
    pub fn load_from_dir(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILENAME);
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };
        match toml::from_str::<Self>(&content) {
            Ok(mut config) => {
                config.config_file_path = Some(path);
                config
            }
            Err(err) => {
                eprintln!("Warning: ignoring malformed {}: {err}", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_dir(dir.path());
        assert!(config.dtsdown.target.is_none());
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_loads_target_and_excludes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            "[dtsdown]\ntarget = \"3.6\"\nexclude_folders = [\"vendor\"]\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path());
        assert_eq!(config.dtsdown.target.as_deref(), Some("3.6"));
        assert_eq!(
            config.dtsdown.exclude_folders,
            Some(vec!["vendor".to_owned()])
        );
        assert!(config.config_file_path.is_some());
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "not [valid toml").unwrap();
        let config = Config::load_from_dir(dir.path());
        assert!(config.dtsdown.target.is_none());
    }
}
