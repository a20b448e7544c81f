//! assetsync Update System
//!
//! Keeps a local artifact in sync with its latest published release,
//! rolling back to the previous file on any failure.
//!
//! Components:
//! - `version_cache` - Fetch-once remote version lookup
//! - `staleness` - Local mtime vs remote publish time
//! - `verify` - SHA256 checksums and sidecar parsing
//! - `download` - HTTP download to a file
//! - `backup` - Backup-then-swap guard
//! - `swap` - Download-verify-swap sequencing
//! - `coordinator` - Check and update entry point

pub mod asset;
pub mod backup;
pub mod coordinator;
pub mod download;
pub mod error;
pub mod staleness;
pub mod swap;
pub mod verify;
pub mod version_cache;

pub use asset::{format_label, LocalAsset};
pub use backup::{ArtifactBackup, BackupState};
pub use coordinator::{DependentService, NoDependentService, Updater};
pub use error::UpdateError;
pub use staleness::{Staleness, StalenessChecker};
pub use version_cache::{Endpoints, RemoteVersion, VersionCache};
