//! Backup and restore of the installed binary.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Manages the sibling backup copy of the installed binary.
///
/// The backup lives next to the target as `<target><suffix>` and is left in
/// place after a successful update.
#[derive(Debug, Clone)]
pub struct BackupManager {
    target: PathBuf,
    backup: PathBuf,
}

impl BackupManager {
    pub fn new(target: impl Into<PathBuf>, suffix: &str) -> Self {
        let target = target.into();
        let mut backup = OsString::from(target.as_os_str());
        backup.push(suffix);
        Self {
            target,
            backup: PathBuf::from(backup),
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// Copies the installed binary to the backup path, replacing any earlier
    /// backup. Returns the number of bytes copied.
    pub async fn create_backup(&self) -> io::Result<u64> {
        let bytes = fs::copy(&self.target, &self.backup).await?;
        info!(
            path = %self.target.display(),
            backup = %self.backup.display(),
            bytes,
            "Backup created"
        );
        Ok(bytes)
    }

    /// Copies the backup back over the installed binary.
    pub async fn restore(&self) -> io::Result<u64> {
        debug!(backup = %self.backup.display(), "Restoring from backup");
        let bytes = fs::copy(&self.backup, &self.target).await?;
        info!(path = %self.target.display(), bytes, "Previous version restored");
        Ok(bytes)
    }
}
