//! Error types for the coordinator module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::extractor::ExtractError;
use crate::fetcher::FetchError;
use crate::registry::RegistryError;
use crate::resolver::ResolveError;
use crate::service::ServiceError;

/// Failure classification of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No eligible artifact.
    NotFound,
    /// Unparseable timestamp or JSON.
    MalformedInput,
    /// The registry or payload host answered unexpectedly, or not at all.
    UnexpectedResponse,
    /// No archive entry matches the naming pattern.
    PayloadNotFound,
    ServiceCommandFailed,
    ServiceCommandUnavailable,
    /// Local filesystem read/write/backup errors.
    IoFailure,
    /// Restoring the backup failed. Needs manual intervention.
    RollbackFailed,
    /// Another attempt is in flight.
    Busy,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not_found",
            Self::MalformedInput => "malformed_input",
            Self::UnexpectedResponse => "unexpected_response",
            Self::PayloadNotFound => "payload_not_found",
            Self::ServiceCommandFailed => "service_command_failed",
            Self::ServiceCommandUnavailable => "service_command_unavailable",
            Self::IoFailure => "io_failure",
            Self::RollbackFailed => "rollback_failed",
            Self::Busy => "busy",
        };
        f.write_str(s)
    }
}

/// Errors that end an update attempt.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// An attempt is already running. Nothing was touched.
    #[error("Update already in progress")]
    Busy,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Local filesystem failure.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A disk-level failure happened after the backup and the previous
    /// binary was restored.
    #[error("{cause} (previous version restored from backup)")]
    RolledBack { cause: Box<UpdateError> },

    /// Restoring the backup failed as well.
    #[error(
        "Rollback failed, manual intervention required: could not restore {} from {}: {source} (update failed with: {cause})",
        .target.display(),
        .backup.display()
    )]
    RollbackFailed {
        cause: Box<UpdateError>,
        target: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UpdateError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Classifies the error.
    ///
    /// A rolled-back attempt reports the kind of the failure that caused the
    /// rollback.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Busy => FailureKind::Busy,
            Self::Registry(e) => registry_kind(e),
            Self::Resolve(ResolveError::NotFound { .. }) => FailureKind::NotFound,
            Self::Resolve(ResolveError::MalformedTimestamp { .. }) => FailureKind::MalformedInput,
            Self::Fetch(FetchError::Registry(e)) => registry_kind(e),
            Self::Fetch(FetchError::Io(_)) => FailureKind::IoFailure,
            Self::Fetch(_) => FailureKind::UnexpectedResponse,
            Self::Extract(ExtractError::PayloadNotFound { .. }) => FailureKind::PayloadNotFound,
            Self::Extract(_) => FailureKind::IoFailure,
            Self::Service(ServiceError::CommandFailed { .. }) => FailureKind::ServiceCommandFailed,
            Self::Service(ServiceError::Unavailable { .. }) => {
                FailureKind::ServiceCommandUnavailable
            }
            Self::Io { .. } => FailureKind::IoFailure,
            Self::RolledBack { cause } => cause.kind(),
            Self::RollbackFailed { .. } => FailureKind::RollbackFailed,
        }
    }

    /// Whether the previous binary was restored.
    pub fn is_rolled_back(&self) -> bool {
        matches!(self, Self::RolledBack { .. })
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

fn registry_kind(error: &RegistryError) -> FailureKind {
    if error.is_malformed_input() {
        FailureKind::MalformedInput
    } else {
        FailureKind::UnexpectedResponse
    }
}
