//! Error types for the fetcher module.

use thiserror::Error;

use crate::registry::RegistryError;

/// Errors that can occur while downloading an archive.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Resolving the download redirect failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The payload location answered with something other than 200.
    #[error("Request [GET {url}] answer status error. Expected {expected}. Actual: {actual}")]
    UnexpectedStatus {
        url: String,
        expected: u16,
        actual: u16,
    },

    /// The payload request or body stream failed.
    #[error("Download from {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// Writing the transient archive file failed.
    #[error("Failed to write downloaded archive: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Creates a transport error from a reqwest error.
    pub fn transport(url: impl Into<String>, error: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            reason: error.to_string(),
        }
    }
}
