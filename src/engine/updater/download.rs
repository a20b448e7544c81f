//! HTTP Download
//!
//! Whole-body downloads: the response is fetched in full and then written
//! as the complete content of the destination file.

use std::fs;
use std::path::Path;

use super::error::UpdateError;
use crate::engine::http::HttpClient;

pub struct Downloader<'a> {
    client: &'a dyn HttpClient,
}

impl<'a> Downloader<'a> {
    pub fn new(client: &'a dyn HttpClient) -> Self {
        Self { client }
    }

    /// Download `url` into `dest`, replacing its content. Returns bytes written.
    pub fn download(&self, url: &str, dest: &Path) -> Result<u64, UpdateError> {
        let response = self
            .client
            .get(url)
            .and_then(|r| r.error_for_status(url))
            .map_err(|e| UpdateError::download(url, e))?;

        fs::write(dest, &response.body).map_err(|e| {
            UpdateError::download(url, format!("writing {}: {}", dest.display(), e))
        })?;

        let bytes = response.body.len() as u64;
        tracing::info!(
            target: "assetsync::update",
            url,
            bytes,
            "download: {} -> SUCCESS",
            dest.display()
        );
        Ok(bytes)
    }
}
