//! Types for the service module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A service manager subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceAction {
    Stop,
    Start,
    Enable,
    /// Re-read unit definitions. Takes no service name.
    DaemonReload,
    Status,
}

impl ServiceAction {
    /// Subcommand as passed on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Start => "start",
            Self::Enable => "enable",
            Self::DaemonReload => "daemon-reload",
            Self::Status => "status",
        }
    }

    /// Whether the subcommand is followed by the service name.
    pub fn takes_service(&self) -> bool {
        !matches!(self, Self::DaemonReload)
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful service manager invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOutput {
    /// Subcommand that ran.
    pub action: ServiceAction,
    /// Full command line, for logs and error messages.
    pub command: String,
    /// Captured stdout followed by stderr.
    ///
    /// The streams are captured separately, so lines are not interleaved in
    /// the order the process wrote them.
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_strings() {
        assert_eq!(ServiceAction::Stop.as_str(), "stop");
        assert_eq!(ServiceAction::DaemonReload.to_string(), "daemon-reload");
        assert!(!ServiceAction::DaemonReload.takes_service());
        assert!(ServiceAction::Status.takes_service());
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&ServiceAction::DaemonReload).unwrap();
        assert_eq!(json, "\"daemon-reload\"");
    }
}
