//! Checksum Verification
//!
//! SHA-256 digests of downloaded artifacts and parsing of `.sha256sum`
//! sidecar files (`<hex digest>  <file name>`).

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use super::error::UpdateError;

/// Calculate SHA256 checksum of a file as lower-case hex
pub fn calculate_sha256(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();

    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// True only if the file is readable and its digest equals `expected`
/// exactly. Comparison is case-sensitive.
pub fn verify_sha256(path: &Path, expected: &str) -> bool {
    match calculate_sha256(path) {
        Ok(actual) => actual == expected,
        Err(_) => false,
    }
}

/// Expected digest from raw sidecar bytes. Needs at least two
/// whitespace-separated fields. The digest field is not required to be
/// UTF-8; anything that is not a hex digest simply fails verification.
pub fn parse_sidecar(content: &[u8], asset: &str) -> Result<String, UpdateError> {
    let mut fields = content
        .split(u8::is_ascii_whitespace)
        .filter(|field| !field.is_empty());
    match (fields.next(), fields.next()) {
        (Some(digest), Some(_)) => Ok(String::from_utf8_lossy(digest).into_owned()),
        _ => Err(UpdateError::ChecksumFormat {
            asset: asset.to_string(),
            reason: "malformed sidecar".to_string(),
        }),
    }
}
