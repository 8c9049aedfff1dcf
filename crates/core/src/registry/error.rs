//! Error types for the registry module.

use thiserror::Error;

/// Errors that can occur while talking to the artifact registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry answered with a status other than the expected one.
    #[error("Request [{method} {url}] answer status error. Expected {expected}. Actual: {actual}")]
    UnexpectedStatus {
        method: &'static str,
        url: String,
        expected: u16,
        actual: u16,
    },

    /// The request never produced a response.
    #[error("Request [{method} {url}] failed: {reason}")]
    Transport {
        method: &'static str,
        url: String,
        reason: String,
    },

    /// A redirect arrived without a usable Location header.
    #[error("Redirect from {url} has no usable Location header: {reason}")]
    MissingLocation { url: String, reason: String },

    /// The artifact list body could not be decoded.
    #[error("Failed to parse artifact list: {0}")]
    InvalidBody(String),

    /// A configured header value (or the token) is not a valid header value.
    #[error("Invalid value for header {header}")]
    InvalidHeader { header: &'static str },

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl RegistryError {
    /// Creates an unexpected status error.
    pub fn unexpected_status(
        method: &'static str,
        url: impl Into<String>,
        expected: u16,
        actual: u16,
    ) -> Self {
        Self::UnexpectedStatus {
            method,
            url: url.into(),
            expected,
            actual,
        }
    }

    /// Creates a transport error from a reqwest error.
    pub fn transport(method: &'static str, url: impl Into<String>, error: reqwest::Error) -> Self {
        let reason = if error.is_timeout() {
            "timed out".to_string()
        } else if error.is_connect() {
            format!("connection failed: {}", error)
        } else {
            error.to_string()
        };
        Self::Transport {
            method,
            url: url.into(),
            reason,
        }
    }

    /// Whether this error means the registry sent data we could not parse.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::InvalidBody(_))
    }
}
