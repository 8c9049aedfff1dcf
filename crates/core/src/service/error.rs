//! Error types for the service module.

use thiserror::Error;

/// Errors that can occur while driving the service manager.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The command ran and exited non-zero.
    #[error("`{command}` failed with exit code {}: {output}", exit_code(.code))]
    CommandFailed {
        command: String,
        /// `None` when the process was killed by a signal.
        code: Option<i32>,
        output: String,
    },

    /// The command could not be launched at all.
    #[error("Failed to launch `{command}`: {reason}")]
    Unavailable { command: String, reason: String },
}

fn exit_code(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string())
}

impl ServiceError {
    /// Captured output, if the command got as far as producing any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { output, .. } => Some(output),
            Self::Unavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message() {
        let err = ServiceError::CommandFailed {
            command: "systemctl start app".to_string(),
            code: Some(5),
            output: "Unit app.service not found.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`systemctl start app` failed with exit code 5: Unit app.service not found."
        );
        assert_eq!(err.output(), Some("Unit app.service not found."));
    }

    #[test]
    fn test_signal_exit_message() {
        let err = ServiceError::CommandFailed {
            command: "systemctl stop app".to_string(),
            code: None,
            output: String::new(),
        };
        assert!(err.to_string().contains("exit code none"));
    }
}
