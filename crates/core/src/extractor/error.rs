//! Error types for the extractor module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting the payload.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No entry matches the naming pattern.
    #[error("No archive entry matches {prefix}*{suffix}")]
    PayloadNotFound { prefix: String, suffix: String },

    /// The archive file could not be opened.
    #[error("Failed to open archive {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a readable zip archive.
    #[error("Corrupt archive {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// An entry could not be read.
    #[error("Failed to read archive entry: {reason}")]
    Entry { reason: String },
}

impl ExtractError {
    pub(crate) fn entry(error: zip::result::ZipError) -> Self {
        Self::Entry {
            reason: error.to_string(),
        }
    }
}
