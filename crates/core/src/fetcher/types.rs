//! Types for the fetcher module.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Progress update during a download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadProgress {
    /// Artifact being downloaded.
    pub artifact_id: u64,
    /// Bytes written so far.
    pub bytes_downloaded: u64,
    /// Total bytes, when the server reported a length.
    pub total_bytes: Option<u64>,
}

/// A downloaded archive in transient storage.
///
/// Owns its temp file: the file is removed when this value is dropped,
/// whether the attempt succeeded or not.
#[derive(Debug)]
pub struct DownloadedArchive {
    file: NamedTempFile,
    artifact_id: u64,
    size_bytes: u64,
    sha256: String,
}

impl DownloadedArchive {
    /// Wraps an already written temp file.
    pub fn new(file: NamedTempFile, artifact_id: u64, size_bytes: u64, sha256: String) -> Self {
        Self {
            file,
            artifact_id,
            size_bytes,
            sha256,
        }
    }

    /// Writes `bytes` to a fresh temp file named after the artifact.
    pub fn from_bytes(artifact_name: &str, artifact_id: u64, bytes: &[u8]) -> std::io::Result<Self> {
        let mut file = temp_archive(artifact_name)?;
        file.write_all(bytes)?;
        file.flush()?;
        let sha256 = format!("{:x}", Sha256::digest(bytes));
        Ok(Self::new(file, artifact_id, bytes.len() as u64, sha256))
    }

    /// Location of the archive on disk.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn artifact_id(&self) -> u64 {
        self.artifact_id
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Hex SHA-256 of the archive.
    pub fn sha256(&self) -> &str {
        &self.sha256
    }
}

/// Creates a temp file named `<artifact>_XXXXXX.zip`.
pub(crate) fn temp_archive(artifact_name: &str) -> std::io::Result<NamedTempFile> {
    let stem: String = artifact_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    tempfile::Builder::new()
        .prefix(&format!("{}_", stem))
        .suffix(".zip")
        .tempfile()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_records_size_and_checksum() {
        let archive = DownloadedArchive::from_bytes("app", 3, b"hello").unwrap();
        assert_eq!(archive.artifact_id(), 3);
        assert_eq!(archive.size_bytes(), 5);
        assert_eq!(
            archive.sha256(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(std::fs::read(archive.path()).unwrap(), b"hello");
    }

    #[test]
    fn test_temp_file_removed_on_drop() {
        let archive = DownloadedArchive::from_bytes("app", 1, b"zip").unwrap();
        let path = archive.path().to_path_buf();
        assert!(path.exists());
        drop(archive);
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_file_name_is_sanitized() {
        let archive = DownloadedArchive::from_bytes("org/app build", 1, b"").unwrap();
        let name = archive.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("org_app_build_"));
        assert!(name.ends_with(".zip"));
    }
}
