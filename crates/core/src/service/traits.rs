//! Trait definitions for the service module.

use async_trait::async_trait;

use super::error::ServiceError;
use super::types::{ServiceAction, ServiceOutput};

/// Issues lifecycle commands to an external service manager.
///
/// Implementations perform no retries. A non-zero exit is
/// [`ServiceError::CommandFailed`], a launch failure is
/// [`ServiceError::Unavailable`].
#[async_trait]
pub trait ServiceManager: Send + Sync {
    /// Returns the name of this manager implementation.
    fn name(&self) -> &str;

    /// Runs one subcommand. `service` is ignored for actions that take no
    /// service name.
    async fn execute(
        &self,
        action: ServiceAction,
        service: &str,
    ) -> Result<ServiceOutput, ServiceError>;

    async fn stop(&self, service: &str) -> Result<ServiceOutput, ServiceError> {
        self.execute(ServiceAction::Stop, service).await
    }

    async fn start(&self, service: &str) -> Result<ServiceOutput, ServiceError> {
        self.execute(ServiceAction::Start, service).await
    }

    async fn enable(&self, service: &str) -> Result<ServiceOutput, ServiceError> {
        self.execute(ServiceAction::Enable, service).await
    }

    /// Makes the manager re-read unit definitions (`daemon-reload`).
    async fn reload_definitions(&self) -> Result<ServiceOutput, ServiceError> {
        self.execute(ServiceAction::DaemonReload, "").await
    }

    async fn status(&self, service: &str) -> Result<ServiceOutput, ServiceError> {
        self.execute(ServiceAction::Status, service).await
    }
}
