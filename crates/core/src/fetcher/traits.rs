//! Trait definitions for the fetcher module.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::registry::Artifact;

use super::error::FetchError;
use super::types::{DownloadProgress, DownloadedArchive};

/// Something that can bring an artifact's archive into local transient storage.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Downloads the artifact's archive.
    async fn fetch(&self, artifact: &Artifact) -> Result<DownloadedArchive, FetchError>;

    /// Downloads the artifact's archive with progress reporting.
    ///
    /// If the receiver is dropped, the download continues without progress.
    async fn fetch_with_progress(
        &self,
        artifact: &Artifact,
        progress_tx: mpsc::Sender<DownloadProgress>,
    ) -> Result<DownloadedArchive, FetchError>;
}
