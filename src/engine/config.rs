//! assetsync Configuration Module
//! Handles loading and validating assetsync.config.json

use crate::engine::updater::{Endpoints, LocalAsset};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "assetsync.config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Invalid config format: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Could not determine data directory")]
    NoDataDir,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,
    #[serde(default = "default_asset_label")]
    pub asset_label: String,
    #[serde(default = "default_local_name")]
    pub local_name: String,
    #[serde(default = "default_remote_name")]
    pub remote_name: String,
    #[serde(default = "default_index_url")]
    pub index_url: String,
    #[serde(default = "default_cdn_base")]
    pub cdn_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_asset_dir() -> PathBuf {
    data_dir()
        .map(|dir| dir.join("assets"))
        .unwrap_or_else(|_| PathBuf::from("./assets"))
}

fn default_asset_label() -> String {
    "GFWList".to_string()
}

fn default_local_name() -> String {
    "LoyalsoldierSite.dat".to_string()
}

fn default_remote_name() -> String {
    "geosite.dat".to_string()
}

fn default_index_url() -> String {
    "https://api.github.com/repos/v2rayA/dist-v2ray-rules-dat/tags".to_string()
}

fn default_cdn_base() -> String {
    "https://cdn.jsdelivr.net/gh/v2rayA/dist-v2ray-rules-dat".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_user_agent() -> String {
    format!("assetsync/{}", env!("CARGO_PKG_VERSION"))
}

/// Platform data directory
///
/// Linux: ~/.local/share/assetsync/
/// Windows: %LOCALAPPDATA%\assetsync\
/// macOS: ~/Library/Application Support/assetsync/
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    #[cfg(target_os = "windows")]
    {
        let local_app_data = dirs::data_local_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(local_app_data.join("assetsync"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let data = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(data.join("assetsync"))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            asset_dir: default_asset_dir(),
            asset_label: default_asset_label(),
            local_name: default_local_name(),
            remote_name: default_remote_name(),
            index_url: default_index_url(),
            cdn_base: default_cdn_base(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl SyncConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: SyncConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Missing file means defaults; a malformed one is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config location inside the data directory
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            asset_label: self.asset_label.clone(),
            index_url: self.index_url.clone(),
            cdn_base: self.cdn_base.clone(),
            remote_name: self.remote_name.clone(),
        }
    }

    pub fn asset(&self) -> LocalAsset {
        LocalAsset::new(&self.asset_dir, &self.local_name)
    }
}
