//! Types for the coordinator module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::registry::Artifact;

use super::error::FailureKind;

/// Where an attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateState {
    Idle,
    Resolving,
    Downloading,
    BackingUp,
    Stopping,
    Replacing,
    Extracting,
    Starting,
    Completed,
    RollingBack,
    RolledBack,
    Fatal,
}

impl UpdateState {
    /// Whether an attempt is in flight in this state.
    pub fn is_active(&self) -> bool {
        !matches!(
            self,
            Self::Idle | Self::Completed | Self::RolledBack | Self::Fatal
        )
    }
}

impl fmt::Display for UpdateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Downloading => "downloading",
            Self::BackingUp => "backing_up",
            Self::Stopping => "stopping",
            Self::Replacing => "replacing",
            Self::Extracting => "extracting",
            Self::Starting => "starting",
            Self::Completed => "completed",
            Self::RollingBack => "rolling_back",
            Self::RolledBack => "rolled_back",
            Self::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

/// Details of a successful attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReport {
    pub attempt_id: Uuid,
    /// The artifact that was installed.
    pub artifact: Artifact,
    pub archive_bytes: u64,
    pub archive_sha256: String,
    /// Name of the archive entry written over the binary.
    pub payload_entry: String,
    pub bytes_written: u64,
    pub payload_sha256: String,
    /// Retained copy of the previous binary.
    pub backup_path: PathBuf,
    /// Whether the service was restarted (false when service control is disabled).
    pub service_restarted: bool,
    /// Output of the post-start status check.
    pub status_output: Option<String>,
    pub state: UpdateState,
    pub duration_ms: u64,
}

/// In-memory record of the most recent attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub attempt_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Terminal state: completed, rolled_back or fatal.
    pub state: UpdateState,
    pub artifact_id: Option<u64>,
    pub failure: Option<FailureKind>,
    pub error: Option<String>,
}
