//! Update Coordinator
//!
//! Composition root for one synced asset: owns the version cache and wires
//! it through the staleness check and the swap.

use std::sync::Arc;

use super::asset::{format_label, LocalAsset};
use super::error::UpdateError;
use super::staleness::{Staleness, StalenessChecker};
use super::swap::ArtifactSwap;
use super::version_cache::{Endpoints, RemoteVersion, VersionCache};
use crate::engine::http::HttpClient;

/// A process that consumes the artifact and must reload after it changes.
pub trait DependentService: Send + Sync {
    /// The process is currently running
    fn is_active(&self) -> bool;
    /// The process is configured in a mode that reads this artifact
    fn depends_on_artifact(&self) -> bool;
    /// Signal that a new artifact is in place
    fn artifact_updated(&self) -> Result<(), String>;
}

/// For callers with nothing to notify
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDependentService;

impl DependentService for NoDependentService {
    fn is_active(&self) -> bool {
        false
    }

    fn depends_on_artifact(&self) -> bool {
        false
    }

    fn artifact_updated(&self) -> Result<(), String> {
        Ok(())
    }
}

pub struct Updater {
    client: Arc<dyn HttpClient>,
    cache: VersionCache,
    asset: LocalAsset,
    service: Arc<dyn DependentService>,
}

impl Updater {
    pub fn new(client: Arc<dyn HttpClient>, endpoints: Endpoints, asset: LocalAsset) -> Self {
        Self {
            client,
            cache: VersionCache::new(endpoints),
            asset,
            service: Arc::new(NoDependentService),
        }
    }

    pub fn with_service(mut self, service: Arc<dyn DependentService>) -> Self {
        self.service = service;
        self
    }

    pub fn asset(&self) -> &LocalAsset {
        &self.asset
    }

    pub fn cache(&self) -> &VersionCache {
        &self.cache
    }

    pub fn remote_version(&self) -> Result<RemoteVersion, UpdateError> {
        self.cache.fetch(self.client.as_ref())
    }

    pub fn is_update_available(&self) -> Result<Staleness, UpdateError> {
        StalenessChecker::new(&self.cache, self.client.as_ref(), &self.asset).check()
    }

    /// Download, verify and swap in the latest artifact unconditionally.
    pub fn update_artifact(&self) -> Result<String, UpdateError> {
        ArtifactSwap::new(&self.cache, self.client.as_ref(), &self.asset).run()
    }

    /// Update only if the local artifact is stale.
    ///
    /// An up-to-date artifact is reported as [`UpdateError::AlreadyCurrent`].
    pub fn check_and_update(&self) -> Result<String, UpdateError> {
        let staleness = self.is_update_available()?;
        if staleness.is_current {
            return Err(UpdateError::AlreadyCurrent {
                asset: self.cache.endpoints().asset_label.clone(),
                remote_date: format_label(staleness.remote_time),
            });
        }

        let version = self.update_artifact()?;

        if self.service.is_active() && self.service.depends_on_artifact() {
            tracing::info!(target: "assetsync::update", "Notifying dependent service");
            self.service.artifact_updated().map_err(UpdateError::Notify)?;
        }
        Ok(version)
    }
}
