use crate::error::{CliError, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileServiceConfig {
    pub default_endpoint: Option<String>,
    pub parallel_endpoint: Option<String>,
    pub expected_version: Option<String>,
    pub version_check: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePollingConfig {
    pub interval_secs: Option<u64>,
    pub max_attempts: Option<u32>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileLocalConfig {
    pub memory_ceiling_mb: Option<u64>,
    pub executable: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub service: Option<FileServiceConfig>,
    pub polling: Option<FilePollingConfig>,
    pub local: Option<FileLocalConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the explicit file if given, else the per-user file when it exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match user_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// `config.toml` inside the platform's per-user configuration directory.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "apbs", "apbs-client").map(|dirs| dirs.config_dir().join("config.toml"))
}
