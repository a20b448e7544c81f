//! Local Asset
//!
//! Filesystem layout of the synced artifact. The artifact's modification time
//! is its version marker; the sidecar and backup live next to it.

use chrono::{DateTime, Local, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::UpdateError;

pub const SIDECAR_SUFFIX: &str = ".sha256sum";
pub const BACKUP_SUFFIX: &str = ".bak";

/// Format used for version labels
pub const LABEL_FORMAT: &str = "%Y-%m-%d";

/// Render a timestamp as a `YYYY-MM-DD` label in local time.
pub fn format_label(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format(LABEL_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalAsset {
    asset_dir: PathBuf,
    file_name: String,
}

impl LocalAsset {
    pub fn new(asset_dir: &Path, file_name: &str) -> Self {
        Self {
            asset_dir: asset_dir.to_path_buf(),
            file_name: file_name.to_string(),
        }
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.asset_dir.join(&self.file_name)
    }

    pub fn sidecar_path(&self) -> PathBuf {
        self.asset_dir
            .join(format!("{}{}", self.file_name, SIDECAR_SUFFIX))
    }

    pub fn backup_path(&self) -> PathBuf {
        self.asset_dir
            .join(format!("{}{}", self.file_name, BACKUP_SUFFIX))
    }

    pub fn exists(&self) -> bool {
        self.artifact_path().is_file()
    }

    /// Modification time of the artifact
    pub fn modified(&self) -> Result<DateTime<Utc>, UpdateError> {
        let path = self.artifact_path();
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| UpdateError::io(&path, e))?;
        Ok(DateTime::<Utc>::from(modified))
    }

    /// `YYYY-MM-DD` of the installed artifact, `None` if not installed
    pub fn version_label(&self) -> Result<Option<String>, UpdateError> {
        if !self.exists() {
            return Ok(None);
        }
        Ok(Some(format_label(self.modified()?)))
    }

    /// Make sure the asset directory exists
    pub fn init(&self) -> Result<(), UpdateError> {
        fs::create_dir_all(&self.asset_dir).map_err(|e| UpdateError::io(&self.asset_dir, e))
    }
}
