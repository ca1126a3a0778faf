use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::TsuzukiError;
use crate::models::SortKey;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub anilist: AniListConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub log_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AniListConfig {
    pub username: String,
    /// Filled in by `login`.
    pub user_id: Option<u64>,
    /// Bearer token for progress updates. Acquiring it is out of scope.
    pub access_token: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub db_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load the user config file if it exists, otherwise built-in defaults.
    pub fn load() -> Result<Self, TsuzukiError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, TsuzukiError> {
        if !path.exists() {
            return Self::parse(DEFAULT_CONFIG);
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| TsuzukiError::Config(e.to_string()))?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self, TsuzukiError> {
        toml::from_str(content).map_err(|e| TsuzukiError::Config(e.to_string()))
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), TsuzukiError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), TsuzukiError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| TsuzukiError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Database location: the configured override or the data dir.
    pub fn db_path(&self) -> PathBuf {
        self.storage.db_path.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|d| d.data_dir().join("tsuzuki.db"))
                .unwrap_or_else(|| PathBuf::from("tsuzuki.db"))
        })
    }

    /// Ensure the database directory exists and return the DB path.
    pub fn ensure_db_path(&self) -> Result<PathBuf, TsuzukiError> {
        let path = self.db_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "tsuzuki")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
