//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the roster storage file, the preferred sort order and the
//! subteams offered by the filter picker.
//!
//! Configuration is stored at `~/.config/teamlist/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use teamlist_core::models::DEFAULT_SUBTEAMS;
use teamlist_core::storage::STORAGE_FILE;
use teamlist_core::SortOrder;

/// Application name used for config/data directory paths
const APP_NAME: &str = "teamlist";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the roster storage file
const STORAGE_FILE_ENV: &str = "TEAMLIST_STORAGE_FILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage_file: Option<PathBuf>,
    pub sort_order: SortOrder,
    pub subteams: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_file: None,
            sort_order: SortOrder::default(),
            subteams: DEFAULT_SUBTEAMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the default roster file and the log file.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Roster file used for loading at startup and saving.
    pub fn storage_path(&self) -> Result<PathBuf> {
        let env_override = std::env::var_os(STORAGE_FILE_ENV).map(PathBuf::from);
        self.resolve_storage_path(env_override)
    }

    fn resolve_storage_path(&self, env_override: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = env_override.or_else(|| self.storage_file.clone()) {
            return Ok(path);
        }
        Ok(self.data_dir()?.join(STORAGE_FILE))
    }
}
