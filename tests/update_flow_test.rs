use assetsync_lib::engine::http::mock::MockHttpClient;
use assetsync_lib::engine::http::HttpError;
use assetsync_lib::engine::updater::{format_label, Endpoints, LocalAsset, UpdateError, Updater};
use chrono::{DateTime, Duration, TimeZone, Utc};
use filetime::FileTime;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use std::sync::Arc;

const INDEX: &str = "https://api.example.com/repos/rules/tags";
const COMMIT: &str = "https://api.example.com/repos/rules/commits/9f2c";
const ARTIFACT: &str = "https://cdn.example.com/gh/rules@202405012210/geosite.dat";
const SIDECAR: &str = "https://cdn.example.com/gh/rules@202405012210/geosite.dat.sha256sum";

const NEW_CONTENT: &[u8] = b"domain:example.org\ndomain:example.net\n";
const OLD_CONTENT: &[u8] = b"domain:example.org\n";

fn remote_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 22, 10, 0).unwrap()
}

fn endpoints() -> Endpoints {
    Endpoints {
        asset_label: "GFWList".to_string(),
        index_url: INDEX.to_string(),
        cdn_base: "https://cdn.example.com/gh/rules".to_string(),
        remote_name: "geosite.dat".to_string(),
    }
}

fn published_release() -> Arc<MockHttpClient> {
    let client = MockHttpClient::new();
    client.set_json(
        INDEX,
        serde_json::json!([
            {"name": "202405012210", "commit": {"sha": "9f2c", "url": COMMIT}}
        ]),
    );
    client.set_json(
        COMMIT,
        serde_json::json!({
            "sha": "9f2c",
            "commit": {"committer": {"name": "bot", "date": "2024-05-01T22:10:00Z"}}
        }),
    );
    client.set_body(ARTIFACT, NEW_CONTENT);
    client.set_body(
        SIDECAR,
        format!("{}  geosite.dat\n", hex::encode(Sha256::digest(NEW_CONTENT))),
    );
    Arc::new(client)
}

fn install_old(asset: &LocalAsset, mtime: DateTime<Utc>) {
    fs::write(asset.artifact_path(), OLD_CONTENT).unwrap();
    filetime::set_file_mtime(
        asset.artifact_path(),
        FileTime::from_unix_time(mtime.timestamp(), 0),
    )
    .unwrap();
}

fn assert_no_leftovers(asset: &LocalAsset) {
    assert!(!asset.backup_path().exists(), "backup left behind");
    assert!(!asset.sidecar_path().exists(), "sidecar left behind");
}

fn updater_in(dir: &Path, client: &Arc<MockHttpClient>) -> (Updater, LocalAsset) {
    let asset = LocalAsset::new(dir, "LoyalsoldierSite.dat");
    let updater = Updater::new(client.clone(), endpoints(), asset.clone());
    (updater, asset)
}

#[test]
fn test_stale_artifact_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let client = published_release();
    let (updater, asset) = updater_in(dir.path(), &client);
    install_old(&asset, remote_time() - Duration::days(2));

    let version = updater.check_and_update().unwrap();

    assert_eq!(version, format_label(remote_time()));
    assert_eq!(fs::read(asset.artifact_path()).unwrap(), NEW_CONTENT);
    assert_eq!(asset.modified().unwrap(), remote_time());
    assert_no_leftovers(&asset);
    assert_eq!(client.requests(), vec![INDEX, COMMIT, ARTIFACT, SIDECAR]);

    // the stamped mtime now makes the asset current
    let err = updater.check_and_update().unwrap_err();
    assert!(err.is_notice());
    assert_eq!(client.request_count(), 4);
}

#[test]
fn test_missing_artifact_is_installed() {
    let dir = tempfile::tempdir().unwrap();
    let client = published_release();
    let (updater, asset) = updater_in(dir.path(), &client);

    assert!(updater.is_update_available().unwrap().update_needed());
    updater.check_and_update().unwrap();
    assert_eq!(fs::read(asset.artifact_path()).unwrap(), NEW_CONTENT);
    assert_eq!(
        asset.version_label().unwrap(),
        Some(format_label(remote_time()))
    );
}

#[test]
fn test_equal_timestamp_is_current() {
    let dir = tempfile::tempdir().unwrap();
    let client = published_release();
    let (updater, asset) = updater_in(dir.path(), &client);
    install_old(&asset, remote_time());

    let err = updater.check_and_update().unwrap_err();
    assert!(matches!(err, UpdateError::AlreadyCurrent { .. }));
    assert_eq!(fs::read(asset.artifact_path()).unwrap(), OLD_CONTENT);
    assert_eq!(client.requests(), vec![INDEX, COMMIT]);
}

#[test]
fn test_download_failure_keeps_previous_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let client = published_release();
    client.set_error(ARTIFACT, HttpError::ConnectionFailed("reset by peer".to_string()));
    let (updater, asset) = updater_in(dir.path(), &client);
    let old_time = remote_time() - Duration::days(2);
    install_old(&asset, old_time);

    let err = updater.check_and_update().unwrap_err();

    assert!(matches!(err, UpdateError::Download { .. }));
    assert_eq!(fs::read(asset.artifact_path()).unwrap(), OLD_CONTENT);
    assert_eq!(asset.modified().unwrap(), old_time);
    assert_no_leftovers(&asset);
}

#[test]
fn test_integrity_failure_reverts() {
    let dir = tempfile::tempdir().unwrap();
    let client = published_release();
    client.set_body(ARTIFACT, "domain:evil.example\n");
    let (updater, asset) = updater_in(dir.path(), &client);
    install_old(&asset, remote_time() - Duration::days(2));

    let err = updater.check_and_update().unwrap_err();

    assert!(matches!(err, UpdateError::Integrity { .. }));
    assert!(err.to_string().contains("update it again"));
    assert_eq!(fs::read(asset.artifact_path()).unwrap(), OLD_CONTENT);
    assert_no_leftovers(&asset);
}

#[test]
fn test_malformed_sidecar_reverts() {
    let dir = tempfile::tempdir().unwrap();
    let client = published_release();
    client.set_body(SIDECAR, "not-a-checksum-file");
    let (updater, asset) = updater_in(dir.path(), &client);
    install_old(&asset, remote_time() - Duration::days(2));

    let err = updater.check_and_update().unwrap_err();

    assert!(matches!(err, UpdateError::ChecksumFormat { .. }));
    assert_eq!(fs::read(asset.artifact_path()).unwrap(), OLD_CONTENT);
    assert_no_leftovers(&asset);
}

#[test]
fn test_failed_lookup_has_no_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let client = published_release();
    client.set_json(COMMIT, serde_json::json!({"sha": "9f2c"}));
    let (updater, asset) = updater_in(dir.path(), &client);
    install_old(&asset, remote_time() - Duration::days(2));

    let err = updater.update_artifact().unwrap_err();

    assert!(matches!(err, UpdateError::RemoteLookup { .. }));
    assert_eq!(fs::read(asset.artifact_path()).unwrap(), OLD_CONTENT);
    assert_no_leftovers(&asset);
    assert!(updater.cache().peek().is_none());
}

#[test]
fn test_forced_update_ignores_staleness() {
    let dir = tempfile::tempdir().unwrap();
    let client = published_release();
    let (updater, asset) = updater_in(dir.path(), &client);
    install_old(&asset, remote_time() + Duration::days(1));

    let version = updater.update_artifact().unwrap();

    assert_eq!(version, format_label(remote_time()));
    assert_eq!(fs::read(asset.artifact_path()).unwrap(), NEW_CONTENT);
    assert_eq!(asset.modified().unwrap(), remote_time());
}
