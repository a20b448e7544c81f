//! Download-verify-swap
//!
//! One update attempt: park the current artifact, download the new one and
//! its sidecar, verify, stamp the remote publish time onto the file. Any
//! failure after the backup is taken rolls the asset directory back through
//! the [`ArtifactBackup`] guard.

use filetime::FileTime;
use std::fs;

use super::asset::{format_label, LocalAsset};
use super::backup::ArtifactBackup;
use super::download::Downloader;
use super::error::UpdateError;
use super::verify::{calculate_sha256, parse_sidecar, verify_sha256};
use super::version_cache::VersionCache;
use crate::engine::http::HttpClient;

pub struct ArtifactSwap<'a> {
    cache: &'a VersionCache,
    client: &'a dyn HttpClient,
    asset: &'a LocalAsset,
}

impl<'a> ArtifactSwap<'a> {
    pub fn new(cache: &'a VersionCache, client: &'a dyn HttpClient, asset: &'a LocalAsset) -> Self {
        Self {
            cache,
            client,
            asset,
        }
    }

    /// Returns the new local version label (`YYYY-MM-DD`).
    pub fn run(&self) -> Result<String, UpdateError> {
        let remote = self.cache.fetch(self.client)?;
        let endpoints = self.cache.endpoints();
        let label = endpoints.asset_label.as_str();

        let artifact = self.asset.artifact_path();
        let sidecar = self.asset.sidecar_path();

        self.asset.init()?;
        let backup = ArtifactBackup::acquire(self.asset)?;
        tracing::debug!(
            target: "assetsync::update",
            state = ?backup.state(),
            "Swap started for {}",
            artifact.display()
        );

        let downloader = Downloader::new(self.client);
        downloader.download(&endpoints.artifact_url(&remote.tag), &artifact)?;
        downloader.download(&endpoints.sidecar_url(&remote.tag), &sidecar)?;

        let content = fs::read(&sidecar).map_err(|e| UpdateError::ChecksumFormat {
            asset: label.to_string(),
            reason: e.to_string(),
        })?;
        let expected = parse_sidecar(&content, label)?;
        if !verify_sha256(&artifact, &expected) {
            let actual = calculate_sha256(&artifact).unwrap_or_default();
            tracing::warn!(
                target: "assetsync::update",
                %expected,
                %actual,
                "Checksum mismatch for {}",
                artifact.display()
            );
            return Err(UpdateError::Integrity {
                asset: label.to_string(),
                expected,
                actual,
            });
        }

        let stamp = FileTime::from_unix_time(
            remote.update_time.timestamp(),
            remote.update_time.timestamp_subsec_nanos(),
        );
        filetime::set_file_times(&artifact, stamp, stamp)
            .map_err(|e| UpdateError::io(&artifact, e))?;
        let modified = self.asset.modified()?;

        backup.commit();

        let version = format_label(modified);
        tracing::info!(
            target: "assetsync::update",
            tag = %remote.tag,
            version = %version,
            "{} updated",
            label
        );
        Ok(version)
    }
}
