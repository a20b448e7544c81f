//! Backup-then-swap guard
//!
//! Acquiring an [`ArtifactBackup`] moves the live artifact aside to
//! `<artifact>.bak`. Until [`ArtifactBackup::commit`] is called, dropping the
//! guard puts things back: the backup is renamed over the artifact path, or,
//! when there was nothing to back up, whatever was written there is removed.
//! The sidecar is removed either way.

use std::fs;
use std::io;
use std::path::Path;

use super::asset::LocalAsset;
use super::error::UpdateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupState {
    /// No artifact existed before the attempt
    NoBackup,
    /// Previous artifact is parked at the backup path
    Pending,
    /// Attempt finished, committed or rolled back
    Resolved,
}

#[derive(Debug)]
pub struct ArtifactBackup<'a> {
    asset: &'a LocalAsset,
    state: BackupState,
}

impl<'a> ArtifactBackup<'a> {
    /// Move the current artifact (if any) to the backup path.
    pub fn acquire(asset: &'a LocalAsset) -> Result<Self, UpdateError> {
        let artifact = asset.artifact_path();
        if !artifact.exists() {
            return Ok(Self {
                asset,
                state: BackupState::NoBackup,
            });
        }

        let backup = asset.backup_path();
        fs::rename(&artifact, &backup).map_err(|source| UpdateError::Backup {
            path: artifact.clone(),
            source,
        })?;
        tracing::debug!(
            target: "assetsync::update",
            backup = %backup.display(),
            "Backed up current artifact"
        );
        Ok(Self {
            asset,
            state: BackupState::Pending,
        })
    }

    pub fn state(&self) -> BackupState {
        self.state
    }

    /// Keep the new artifact; drop the sidecar and the backup.
    pub fn commit(mut self) {
        remove_best_effort(&self.asset.sidecar_path());
        if self.state == BackupState::Pending {
            remove_best_effort(&self.asset.backup_path());
        }
        self.state = BackupState::Resolved;
    }

    fn restore(&mut self) {
        let artifact = self.asset.artifact_path();
        match self.state {
            BackupState::Pending => {
                if let Err(e) = fs::rename(self.asset.backup_path(), &artifact) {
                    tracing::warn!(
                        target: "assetsync::update",
                        error = %e,
                        "Failed to restore backup of {}",
                        artifact.display()
                    );
                } else {
                    tracing::info!(
                        target: "assetsync::update",
                        "Restored previous {}",
                        artifact.display()
                    );
                }
            }
            BackupState::NoBackup => remove_best_effort(&artifact),
            BackupState::Resolved => return,
        }
        remove_best_effort(&self.asset.sidecar_path());
        self.state = BackupState::Resolved;
    }
}

impl Drop for ArtifactBackup<'_> {
    fn drop(&mut self) {
        self.restore();
    }
}

fn remove_best_effort(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            target: "assetsync::update",
            error = %e,
            "Failed to remove {}",
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn asset_in(dir: &Path) -> LocalAsset {
        LocalAsset::new(dir, "site.dat")
    }

    #[test]
    fn test_acquire_without_artifact() {
        let dir = tempdir().unwrap();
        let asset = asset_in(dir.path());

        let guard = ArtifactBackup::acquire(&asset).unwrap();
        assert_eq!(guard.state(), BackupState::NoBackup);
        assert!(!asset.backup_path().exists());
    }

    #[test]
    fn test_drop_restores_backup() {
        let dir = tempdir().unwrap();
        let asset = asset_in(dir.path());
        fs::write(asset.artifact_path(), b"old").unwrap();

        {
            let guard = ArtifactBackup::acquire(&asset).unwrap();
            assert_eq!(guard.state(), BackupState::Pending);
            assert!(!asset.artifact_path().exists());
            assert_eq!(fs::read(asset.backup_path()).unwrap(), b"old");

            fs::write(asset.artifact_path(), b"partial").unwrap();
            fs::write(asset.sidecar_path(), b"abc  site.dat").unwrap();
        }

        assert_eq!(fs::read(asset.artifact_path()).unwrap(), b"old");
        assert!(!asset.backup_path().exists());
        assert!(!asset.sidecar_path().exists());
    }

    #[test]
    fn test_drop_removes_partial_without_backup() {
        let dir = tempdir().unwrap();
        let asset = asset_in(dir.path());

        {
            let _guard = ArtifactBackup::acquire(&asset).unwrap();
            fs::write(asset.artifact_path(), b"partial").unwrap();
        }

        assert!(!asset.artifact_path().exists());
        assert!(!asset.backup_path().exists());
    }

    #[test]
    fn test_commit_keeps_new_artifact() {
        let dir = tempdir().unwrap();
        let asset = asset_in(dir.path());
        fs::write(asset.artifact_path(), b"old").unwrap();

        let guard = ArtifactBackup::acquire(&asset).unwrap();
        fs::write(asset.artifact_path(), b"new").unwrap();
        fs::write(asset.sidecar_path(), b"abc  site.dat").unwrap();
        guard.commit();

        assert_eq!(fs::read(asset.artifact_path()).unwrap(), b"new");
        assert!(!asset.backup_path().exists());
        assert!(!asset.sidecar_path().exists());
    }

    #[test]
    fn test_resolved_guard_drop_is_noop() {
        let dir = tempdir().unwrap();
        let asset = asset_in(dir.path());
        fs::write(asset.artifact_path(), b"old").unwrap();

        let guard = ArtifactBackup::acquire(&asset).unwrap();
        fs::write(asset.artifact_path(), b"new").unwrap();
        guard.commit();
        fs::write(asset.backup_path(), b"unrelated").unwrap();

        assert_eq!(fs::read(asset.artifact_path()).unwrap(), b"new");
        assert_eq!(fs::read(asset.backup_path()).unwrap(), b"unrelated");
    }

    #[test]
    fn test_backup_failure() {
        let dir = tempdir().unwrap();
        let asset = asset_in(dir.path());
        fs::write(asset.artifact_path(), b"old").unwrap();
        // a file cannot be renamed over a non-empty directory
        fs::create_dir(asset.backup_path()).unwrap();
        fs::write(asset.backup_path().join("keep"), b"x").unwrap();

        let err = ArtifactBackup::acquire(&asset).unwrap_err();

        assert!(matches!(err, UpdateError::Backup { .. }));
        assert_eq!(fs::read(asset.artifact_path()).unwrap(), b"old");
        assert!(asset.backup_path().join("keep").exists());
    }
}
