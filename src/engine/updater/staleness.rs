//! Staleness check: local artifact mtime against the remote publish time.

use chrono::{DateTime, Utc};

use super::asset::LocalAsset;
use super::error::UpdateError;
use super::version_cache::VersionCache;
use crate::engine::http::HttpClient;

/// Outcome of a staleness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staleness {
    /// Local artifact is at least as new as the remote one
    pub is_current: bool,
    pub remote_time: DateTime<Utc>,
}

impl Staleness {
    pub fn update_needed(&self) -> bool {
        !self.is_current
    }
}

/// `local >= remote` counts as current; equal timestamps need no update.
pub fn is_current(local: Option<DateTime<Utc>>, remote: DateTime<Utc>) -> bool {
    match local {
        Some(local) => local >= remote,
        None => false,
    }
}

pub struct StalenessChecker<'a> {
    cache: &'a VersionCache,
    client: &'a dyn HttpClient,
    asset: &'a LocalAsset,
}

impl<'a> StalenessChecker<'a> {
    pub fn new(cache: &'a VersionCache, client: &'a dyn HttpClient, asset: &'a LocalAsset) -> Self {
        Self {
            cache,
            client,
            asset,
        }
    }

    pub fn check(&self) -> Result<Staleness, UpdateError> {
        let remote = self.cache.fetch(self.client)?;
        let local = if self.asset.exists() {
            Some(self.asset.modified()?)
        } else {
            None
        };

        let staleness = Staleness {
            is_current: is_current(local, remote.update_time),
            remote_time: remote.update_time,
        };
        tracing::debug!(
            target: "assetsync::update",
            local = ?local,
            remote = %remote.update_time,
            is_current = staleness.is_current,
            "Staleness checked"
        );
        Ok(staleness)
    }
}
