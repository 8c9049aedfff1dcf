//! HTTP fetcher implementation.

use async_trait::async_trait;
use reqwest::{redirect, Client, StatusCode};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::registry::{Artifact, ArtifactRegistry};

use super::error::FetchError;
use super::traits::Fetcher;
use super::types::{temp_archive, DownloadProgress, DownloadedArchive};

/// Downloads archives over HTTP after a single registry redirect hop.
///
/// The payload request carries no registry credentials.
pub struct HttpFetcher {
    client: Client,
    registry: Arc<dyn ArtifactRegistry>,
}

impl HttpFetcher {
    /// Creates a fetcher resolving download references through `registry`.
    pub fn new(
        registry: Arc<dyn ArtifactRegistry>,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let mut builder = Client::builder().redirect(redirect::Policy::none());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, registry })
    }

    /// Runs the download with optional progress reporting.
    async fn run_download(
        &self,
        artifact: &Artifact,
        progress_tx: Option<mpsc::Sender<DownloadProgress>>,
    ) -> Result<DownloadedArchive, FetchError> {
        let start = Instant::now();

        let location = self.registry.download_location(artifact).await?;
        debug!(artifact_id = artifact.id, location = %location, "Download url resolved");

        let mut response = self
            .client
            .get(location.clone())
            .send()
            .await
            .map_err(|e| FetchError::transport(location.as_str(), e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus {
                url: location.to_string(),
                expected: StatusCode::OK.as_u16(),
                actual: status.as_u16(),
            });
        }

        let total_bytes = response.content_length();
        let temp = temp_archive(&artifact.name)?;
        let mut writer = BufWriter::new(tokio::fs::File::from_std(temp.as_file().try_clone()?));
        let mut hasher = Sha256::new();
        let mut bytes_downloaded = 0u64;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::transport(location.as_str(), e))?
        {
            hasher.update(&chunk);
            writer.write_all(&chunk).await?;
            bytes_downloaded += chunk.len() as u64;

            if let Some(ref tx) = progress_tx {
                // Non-blocking send
                let _ = tx.try_send(DownloadProgress {
                    artifact_id: artifact.id,
                    bytes_downloaded,
                    total_bytes,
                });
            }
        }

        writer.flush().await?;
        writer.into_inner().sync_all().await?;

        // Intermediate updates may have been dropped on a full channel
        if let Some(tx) = progress_tx {
            let _ = tx
                .send(DownloadProgress {
                    artifact_id: artifact.id,
                    bytes_downloaded,
                    total_bytes,
                })
                .await;
        }

        let sha256 = format!("{:x}", hasher.finalize());
        info!(
            artifact_id = artifact.id,
            bytes = bytes_downloaded,
            duration_ms = start.elapsed().as_millis() as u64,
            "Artifact downloaded"
        );

        Ok(DownloadedArchive::new(
            temp,
            artifact.id,
            bytes_downloaded,
            sha256,
        ))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, artifact: &Artifact) -> Result<DownloadedArchive, FetchError> {
        self.run_download(artifact, None).await
    }

    async fn fetch_with_progress(
        &self,
        artifact: &Artifact,
        progress_tx: mpsc::Sender<DownloadProgress>,
    ) -> Result<DownloadedArchive, FetchError> {
        self.run_download(artifact, Some(progress_tx)).await
    }
}
