//! Update attempt runner.

use chrono::{DateTime, Utc};
use futures::FutureExt;
use sha2::{Digest, Sha256};
use std::any::Any;
use std::io::{self, BufWriter, Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::extractor::PackageArchive;
use crate::fetcher::{DownloadProgress, DownloadedArchive, Fetcher};
use crate::registry::ArtifactRegistry;
use crate::resolver::resolve_artifact;
use crate::service::ServiceManager;

use super::backup::BackupManager;
use super::error::{FailureKind, UpdateError};
use super::types::{AttemptSummary, UpdateReport, UpdateState};

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Payload written over the installed binary.
struct WrittenPayload {
    entry: String,
    bytes_written: u64,
    sha256: String,
}

/// Runs update attempts, one at a time.
///
/// A second attempt requested while one is in flight is rejected with
/// [`UpdateError::Busy`] rather than queued.
pub struct UpdateCoordinator {
    config: Config,
    registry: Arc<dyn ArtifactRegistry>,
    fetcher: Arc<dyn Fetcher>,
    service: Arc<dyn ServiceManager>,
    backup: BackupManager,
    attempt_lock: Mutex<()>,
    state: RwLock<UpdateState>,
    last_outcome: RwLock<Option<AttemptSummary>>,
}

impl UpdateCoordinator {
    pub fn new(
        config: Config,
        registry: Arc<dyn ArtifactRegistry>,
        fetcher: Arc<dyn Fetcher>,
        service: Arc<dyn ServiceManager>,
    ) -> Self {
        let backup = BackupManager::new(
            &config.application.path,
            &config.application.backup_suffix,
        );
        Self {
            config,
            registry,
            fetcher,
            service,
            backup,
            attempt_lock: Mutex::new(()),
            state: RwLock::new(UpdateState::Idle),
            last_outcome: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backup(&self) -> &BackupManager {
        &self.backup
    }

    /// Current state. Stays at the terminal state of the last attempt until
    /// the next one starts.
    pub async fn state(&self) -> UpdateState {
        *self.state.read().await
    }

    /// Summary of the most recent finished attempt.
    pub async fn last_outcome(&self) -> Option<AttemptSummary> {
        self.last_outcome.read().await.clone()
    }

    /// Runs one update attempt.
    pub async fn run(&self) -> Result<UpdateReport, UpdateError> {
        self.run_attempt(None).await
    }

    /// Runs one update attempt, forwarding download progress to `progress_tx`.
    pub async fn run_with_progress(
        &self,
        progress_tx: mpsc::Sender<DownloadProgress>,
    ) -> Result<UpdateReport, UpdateError> {
        self.run_attempt(Some(progress_tx)).await
    }

    async fn run_attempt(
        &self,
        progress_tx: Option<mpsc::Sender<DownloadProgress>>,
    ) -> Result<UpdateReport, UpdateError> {
        let _guard = self.attempt_lock.try_lock().map_err(|_| {
            warn!("Update requested while another attempt is running");
            UpdateError::Busy
        })?;

        let attempt_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = info_span!("update", attempt_id = %attempt_id);
        let mut artifact_id = None;

        let outcome = AssertUnwindSafe(
            self.execute(attempt_id, progress_tx, &mut artifact_id)
                .instrument(span),
        )
        .catch_unwind()
        .await;

        let result = match outcome {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(attempt_id = %attempt_id, panic = %message, "Update attempt panicked");
                // No failure kind: the panic is outside the failure taxonomy
                self.finish(
                    attempt_id,
                    started_at,
                    artifact_id,
                    UpdateState::Fatal,
                    None,
                    Some(format!("Update attempt panicked: {}", message)),
                )
                .await;
                panic::resume_unwind(payload);
            }
        };

        let (state, failure, message) = match &result {
            Ok(report) => {
                info!(
                    attempt_id = %attempt_id,
                    artifact_id = report.artifact.id,
                    duration_ms = report.duration_ms,
                    "Application successfully updated"
                );
                (UpdateState::Completed, None, None)
            }
            Err(e) => {
                error!(attempt_id = %attempt_id, kind = %e.kind(), error = %e, "Update failed");
                let state = if e.is_rolled_back() {
                    UpdateState::RolledBack
                } else {
                    UpdateState::Fatal
                };
                (state, Some(e.kind()), Some(e.to_string()))
            }
        };

        self.finish(attempt_id, started_at, artifact_id, state, failure, message)
            .await;
        result
    }

    /// Moves to the terminal `state` and records the attempt summary.
    async fn finish(
        &self,
        attempt_id: Uuid,
        started_at: DateTime<Utc>,
        artifact_id: Option<u64>,
        state: UpdateState,
        failure: Option<FailureKind>,
        error: Option<String>,
    ) {
        self.set_state(state).await;
        *self.last_outcome.write().await = Some(AttemptSummary {
            attempt_id,
            started_at,
            finished_at: Utc::now(),
            state,
            artifact_id,
            failure,
            error,
        });
    }

    async fn execute(
        &self,
        attempt_id: Uuid,
        progress_tx: Option<mpsc::Sender<DownloadProgress>>,
        artifact_id: &mut Option<u64>,
    ) -> Result<UpdateReport, UpdateError> {
        let start = Instant::now();

        self.set_state(UpdateState::Resolving).await;
        let list = self.registry.list_artifacts().await?;
        let artifact =
            resolve_artifact(&list.artifacts, &self.config.registry.artifact_name)?.clone();
        *artifact_id = Some(artifact.id);
        info!(
            artifact_id = artifact.id,
            created_at = %artifact.created_at,
            registry = self.registry.name(),
            "Artifact resolved"
        );

        self.set_state(UpdateState::Downloading).await;
        let archive = match progress_tx {
            Some(tx) => self.fetcher.fetch_with_progress(&artifact, tx).await?,
            None => self.fetcher.fetch(&artifact).await?,
        };

        self.set_state(UpdateState::BackingUp).await;
        self.backup.create_backup().await.map_err(|e| {
            UpdateError::io(
                format!("Failed to back up {}", self.backup.target().display()),
                e,
            )
        })?;

        let service = &self.config.service;
        if service.enabled {
            self.set_state(UpdateState::Stopping).await;
            self.service.stop(&service.name).await?;
            info!(service = %service.name, "Service stopped");
        }

        // Rollback point: disk-level failures from here restore the backup
        let payload = match self.replace_binary(&archive).await {
            Ok(payload) => payload,
            Err(cause) => return Err(self.roll_back(cause).await),
        };
        info!(
            entry = %payload.entry,
            bytes = payload.bytes_written,
            path = %self.backup.target().display(),
            "Application binary replaced"
        );

        let status_output = if service.enabled {
            self.set_state(UpdateState::Starting).await;
            Some(self.start_service(&service.name).await?)
        } else {
            None
        };

        Ok(UpdateReport {
            attempt_id,
            artifact,
            archive_bytes: archive.size_bytes(),
            archive_sha256: archive.sha256().to_string(),
            payload_entry: payload.entry,
            bytes_written: payload.bytes_written,
            payload_sha256: payload.sha256,
            backup_path: self.backup.backup_path().to_path_buf(),
            service_restarted: service.enabled,
            status_output,
            state: UpdateState::Completed,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Truncates the installed binary, then streams the payload entry into it.
    ///
    /// The file handle is closed by the time this returns.
    async fn replace_binary(
        &self,
        archive: &DownloadedArchive,
    ) -> Result<WrittenPayload, UpdateError> {
        self.set_state(UpdateState::Replacing).await;
        let target = self.backup.target();
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(target)
            .await
            .map_err(|e| {
                UpdateError::io(format!("Failed to open {} for writing", target.display()), e)
            })?
            .into_std()
            .await;

        self.set_state(UpdateState::Extracting).await;
        let archive_path = archive.path().to_path_buf();
        let prefix = self.config.application.updated_prefix.clone();
        let suffix = self.config.application.updated_suffix.clone();

        tokio::task::spawn_blocking(move || write_payload(&archive_path, &prefix, &suffix, file))
            .await
            .map_err(|e| UpdateError::io("Extraction task failed", io::Error::other(e.to_string())))?
    }

    /// Reload, start, enable, settle, status. No rollback on failure.
    async fn start_service(&self, name: &str) -> Result<String, UpdateError> {
        self.service.reload_definitions().await?;
        self.service.start(name).await?;
        self.service.enable(name).await?;
        info!(service = %name, "Service started");

        tokio::time::sleep(self.config.service.settle_delay()).await;
        let status = self.service.status(name).await?;
        debug!(service = %name, status = %status.output.trim_end(), "Service status");
        Ok(status.output)
    }

    /// Restores the backup once. Never retried.
    async fn roll_back(&self, cause: UpdateError) -> UpdateError {
        warn!(error = %cause, "Replacing the application failed, restoring previous version");
        self.set_state(UpdateState::RollingBack).await;

        match self.backup.restore().await {
            Ok(_) => UpdateError::RolledBack {
                cause: Box::new(cause),
            },
            Err(source) => {
                error!(
                    backup = %self.backup.backup_path().display(),
                    error = %source,
                    "Rollback failed, manual intervention required"
                );
                UpdateError::RollbackFailed {
                    cause: Box::new(cause),
                    target: self.backup.target().to_path_buf(),
                    backup: self.backup.backup_path().to_path_buf(),
                    source,
                }
            }
        }
    }

    async fn set_state(&self, state: UpdateState) {
        *self.state.write().await = state;
        debug!(state = %state, "Update state changed");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Copies the first matching archive entry into `file`, then syncs and
/// closes it.
fn write_payload(
    archive_path: &Path,
    prefix: &str,
    suffix: &str,
    file: std::fs::File,
) -> Result<WrittenPayload, UpdateError> {
    let mut package = PackageArchive::open(archive_path)?;
    debug!(entries = ?package.entry_names()?, "Archive opened");
    let (entry, mut reader) = package.payload(prefix, suffix)?;

    let mut writer = BufWriter::new(file);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut bytes_written = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(UpdateError::io(format!("Failed to read {}", entry), e)),
        };
        hasher.update(&buf[..n]);
        writer
            .write_all(&buf[..n])
            .map_err(|e| UpdateError::io("Failed to write application binary", e))?;
        bytes_written += n as u64;
    }

    let file = writer
        .into_inner()
        .map_err(|e| UpdateError::io("Failed to write application binary", e.into_error()))?;
    file.sync_all()
        .map_err(|e| UpdateError::io("Failed to sync application binary", e))?;
    drop(file);

    Ok(WrittenPayload {
        entry,
        bytes_written,
        sha256: format!("{:x}", hasher.finalize()),
    })
}
