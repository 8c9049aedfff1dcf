//! Mock fetcher for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

use crate::fetcher::{DownloadProgress, DownloadedArchive, FetchError, Fetcher};
use crate::registry::Artifact;

/// Mock implementation of the Fetcher trait.
///
/// Writes the configured archive bytes to a real temp file, so extraction
/// runs against an actual zip.
#[derive(Debug, Clone)]
pub struct MockFetcher {
    archive: Arc<RwLock<Vec<u8>>>,
    /// If set, the next fetch fails with this error.
    next_error: Arc<RwLock<Option<FetchError>>>,
    /// Simulated download duration.
    delay: Arc<RwLock<Duration>>,
    /// Temp file paths handed out, in order.
    fetched: Arc<RwLock<Vec<PathBuf>>>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            archive: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(Duration::ZERO)),
            fetched: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the archive bytes served for every artifact.
    pub async fn set_archive(&self, bytes: Vec<u8>) {
        *self.archive.write().await = bytes;
    }

    /// Make the next fetch fail.
    pub async fn fail_next(&self, error: FetchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the simulated download duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Temp file paths of the archives handed out so far.
    pub async fn fetched_paths(&self) -> Vec<PathBuf> {
        self.fetched.read().await.clone()
    }

    async fn download(
        &self,
        artifact: &Artifact,
        progress_tx: Option<mpsc::Sender<DownloadProgress>>,
    ) -> Result<DownloadedArchive, FetchError> {
        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let bytes = self.archive.read().await.clone();
        let archive = DownloadedArchive::from_bytes(&artifact.name, artifact.id, &bytes)?;
        self.fetched.write().await.push(archive.path().to_path_buf());

        if let Some(tx) = progress_tx {
            let _ = tx.try_send(DownloadProgress {
                artifact_id: artifact.id,
                bytes_downloaded: bytes.len() as u64,
                total_bytes: Some(bytes.len() as u64),
            });
        }

        Ok(archive)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, artifact: &Artifact) -> Result<DownloadedArchive, FetchError> {
        self.download(artifact, None).await
    }

    async fn fetch_with_progress(
        &self,
        artifact: &Artifact,
        progress_tx: mpsc::Sender<DownloadProgress>,
    ) -> Result<DownloadedArchive, FetchError> {
        self.download(artifact, Some(progress_tx)).await
    }
}
