//! `systemctl`-based service manager.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

use super::error::ServiceError;
use super::traits::ServiceManager;
use super::types::{ServiceAction, ServiceOutput};

/// Drives services through a `systemctl`-compatible executable.
pub struct SystemctlManager {
    manager_path: PathBuf,
}

impl SystemctlManager {
    pub fn new(manager_path: impl Into<PathBuf>) -> Self {
        Self {
            manager_path: manager_path.into(),
        }
    }

    fn args(action: ServiceAction, service: &str) -> Vec<&str> {
        if action.takes_service() {
            vec![action.as_str(), service]
        } else {
            vec![action.as_str()]
        }
    }
}

#[async_trait]
impl ServiceManager for SystemctlManager {
    fn name(&self) -> &str {
        "systemctl"
    }

    async fn execute(
        &self,
        action: ServiceAction,
        service: &str,
    ) -> Result<ServiceOutput, ServiceError> {
        let args = Self::args(action, service);
        let command = format!("{} {}", self.manager_path.display(), args.join(" "));

        let output = Command::new(&self.manager_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| ServiceError::Unavailable {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        debug!(command = %command, status = %output.status, output = %combined.trim_end(), "Service command finished");

        if !output.status.success() {
            return Err(ServiceError::CommandFailed {
                command,
                code: output.status.code(),
                output: combined,
            });
        }

        Ok(ServiceOutput {
            action,
            command,
            output: combined,
        })
    }
}
