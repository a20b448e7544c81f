//! Update errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Failed to get latest version of {asset}: {reason}")]
    RemoteLookup { asset: String, reason: String },
    #[error("Failed to backup {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },
    #[error("Failed to check sha256sum of {asset} file: {reason}")]
    ChecksumFormat { asset: String, reason: String },
    #[error("Damaged {asset} file (expected {expected}, got {actual}), update it again please")]
    Integrity {
        asset: String,
        expected: String,
        actual: String,
    },
    #[error("Latest version is {remote_date}. {asset} is up to date")]
    AlreadyCurrent { asset: String, remote_date: String },
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to notify dependent service: {0}")]
    Notify(String),
}

impl UpdateError {
    pub(crate) fn lookup(asset: &str, reason: impl Into<String>) -> Self {
        Self::RemoteLookup {
            asset: asset.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn download(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Download {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// `AlreadyCurrent` travels through the error channel but is not a failure.
    pub fn is_notice(&self) -> bool {
        matches!(self, Self::AlreadyCurrent { .. })
    }

    /// Stable code for logs and JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RemoteLookup { .. } => "remote_lookup",
            Self::Backup { .. } => "backup",
            Self::Download { .. } => "download",
            Self::ChecksumFormat { .. } => "checksum_format",
            Self::Integrity { .. } => "integrity",
            Self::AlreadyCurrent { .. } => "already_current",
            Self::Io { .. } => "io",
            Self::Notify(_) => "notify",
        }
    }
}
