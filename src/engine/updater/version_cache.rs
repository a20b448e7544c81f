//! Remote version discovery
//!
//! The latest published version is looked up once per [`VersionCache`] and
//! then served from memory. There is no expiry: the owner decides the
//! lifetime by deciding how long to keep the cache around.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::{Mutex, MutexGuard};

use super::error::UpdateError;
use crate::engine::http::HttpClient;

/// Latest known published version of the remote artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteVersion {
    pub tag: String,
    pub update_time: DateTime<Utc>,
}

/// Where the remote artifact lives
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    /// Human name used in messages
    pub asset_label: String,
    pub index_url: String,
    pub cdn_base: String,
    pub remote_name: String,
}

impl Endpoints {
    /// `<cdn-base>@<tag>/<artifact-name>`
    pub fn artifact_url(&self, tag: &str) -> String {
        format!(
            "{}@{}/{}",
            self.cdn_base.trim_end_matches('/'),
            tag,
            self.remote_name
        )
    }

    pub fn sidecar_url(&self, tag: &str) -> String {
        format!("{}.sha256sum", self.artifact_url(tag))
    }
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    commit: Option<CommitRef>,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    #[serde(default)]
    commit: Option<CommitBody>,
}

#[derive(Debug, Deserialize)]
struct CommitBody {
    #[serde(default)]
    committer: Option<Committer>,
}

#[derive(Debug, Deserialize)]
struct Committer {
    #[serde(default)]
    date: Option<String>,
}

/// Fetch-once cache for the remote version.
#[derive(Debug)]
pub struct VersionCache {
    endpoints: Endpoints,
    cached: Mutex<Option<RemoteVersion>>,
}

impl VersionCache {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            cached: Mutex::new(None),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Cached value, if any, without touching the network
    pub fn peek(&self) -> Option<RemoteVersion> {
        self.lock().clone()
    }

    /// Return the cached version, fetching it first if the cache is empty.
    ///
    /// The lock is held across the network round-trips, so concurrent
    /// callers wait for the first one and then share its result.
    pub fn fetch(&self, client: &dyn HttpClient) -> Result<RemoteVersion, UpdateError> {
        let mut cached = self.lock();
        if let Some(version) = cached.as_ref() {
            return Ok(version.clone());
        }

        let version = self.lookup(client)?;
        tracing::info!(
            target: "assetsync::update",
            tag = %version.tag,
            update_time = %version.update_time,
            "Latest {} version resolved",
            self.endpoints.asset_label
        );
        *cached = Some(version.clone());
        Ok(version)
    }

    fn lookup(&self, client: &dyn HttpClient) -> Result<RemoteVersion, UpdateError> {
        let asset = self.endpoints.asset_label.as_str();

        let tags: Vec<TagEntry> = get_json(client, &self.endpoints.index_url, asset)?;
        let latest = tags.into_iter().next();
        let (tag, commit_url) = match latest {
            Some(TagEntry {
                name,
                commit: Some(CommitRef { url }),
            }) if !name.is_empty() && !url.is_empty() => (name, url),
            _ => return Err(UpdateError::lookup(asset, "fail in getting latest tag")),
        };

        let detail: CommitDetail = get_json(client, &commit_url, asset)?;
        let date = detail
            .commit
            .and_then(|c| c.committer)
            .and_then(|c| c.date)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| {
                UpdateError::lookup(asset, "fail in getting commit date of latest tag")
            })?;
        let update_time = DateTime::parse_from_rfc3339(&date)
            .map_err(|e| {
                UpdateError::lookup(asset, format!("invalid commit date {:?}: {}", date, e))
            })?
            .with_timezone(&Utc);

        Ok(RemoteVersion { tag, update_time })
    }

    fn lock(&self) -> MutexGuard<'_, Option<RemoteVersion>> {
        self.cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn get_json<T: serde::de::DeserializeOwned>(
    client: &dyn HttpClient,
    url: &str,
    asset: &str,
) -> Result<T, UpdateError> {
    tracing::debug!(target: "assetsync::update", url, "GET");
    let response = client
        .get(url)
        .and_then(|r| r.error_for_status(url))
        .map_err(|e| UpdateError::lookup(asset, e.to_string()))?;
    response
        .json()
        .map_err(|e| UpdateError::lookup(asset, format!("unexpected response from {}: {}", url, e)))
}
