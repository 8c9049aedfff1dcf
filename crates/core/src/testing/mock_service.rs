//! Mock service manager for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::service::{ServiceAction, ServiceError, ServiceManager, ServiceOutput};

type Hook = Arc<dyn Fn(ServiceAction) + Send + Sync>;

/// A recorded service command for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub action: ServiceAction,
    /// Empty for actions that take no service name.
    pub service: String,
    /// Contents of the observed file when the command ran.
    pub file_snapshot: Option<Vec<u8>>,
}

/// Mock implementation of the ServiceManager trait.
///
/// Records every command, can fail a chosen action and can snapshot a file
/// each time a command runs.
///
/// # Example
///
/// ```rust,ignore
/// let service = MockServiceManager::new();
/// service.fail_on(ServiceAction::Start, ServiceError::CommandFailed { .. }).await;
///
/// // ... run an update ...
///
/// assert_eq!(service.actions().await, vec![ServiceAction::Stop, ServiceAction::DaemonReload, ServiceAction::Start]);
/// ```
#[derive(Clone)]
pub struct MockServiceManager {
    commands: Arc<RwLock<Vec<RecordedCommand>>>,
    failures: Arc<RwLock<HashMap<ServiceAction, ServiceError>>>,
    observed_file: Arc<RwLock<Option<PathBuf>>>,
    hook: Arc<RwLock<Option<Hook>>>,
}

impl Default for MockServiceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServiceManager {
    pub fn new() -> Self {
        Self {
            commands: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            observed_file: Arc::new(RwLock::new(None)),
            hook: Arc::new(RwLock::new(None)),
        }
    }

    /// Make the next invocation of `action` fail with `error`.
    pub async fn fail_on(&self, action: ServiceAction, error: ServiceError) {
        self.failures.write().await.insert(action, error);
    }

    /// Snapshot `path` every time a command runs.
    pub async fn observe_file(&self, path: impl Into<PathBuf>) {
        *self.observed_file.write().await = Some(path.into());
    }

    /// Run `hook` before each command is recorded.
    pub async fn on_execute(&self, hook: impl Fn(ServiceAction) + Send + Sync + 'static) {
        *self.hook.write().await = Some(Arc::new(hook));
    }

    /// All recorded commands.
    pub async fn recorded_commands(&self) -> Vec<RecordedCommand> {
        self.commands.read().await.clone()
    }

    /// Recorded actions, in order.
    pub async fn actions(&self) -> Vec<ServiceAction> {
        self.commands
            .read()
            .await
            .iter()
            .map(|c| c.action)
            .collect()
    }
}

#[async_trait]
impl ServiceManager for MockServiceManager {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(
        &self,
        action: ServiceAction,
        service: &str,
    ) -> Result<ServiceOutput, ServiceError> {
        if let Some(hook) = self.hook.read().await.clone() {
            hook(action);
        }

        let file_snapshot = match self.observed_file.read().await.as_ref() {
            Some(path) => std::fs::read(path).ok(),
            None => None,
        };
        let service = if action.takes_service() {
            service.to_string()
        } else {
            String::new()
        };
        let command = format!("mockctl {} {}", action, service).trim_end().to_string();

        self.commands.write().await.push(RecordedCommand {
            action,
            service: service.clone(),
            file_snapshot,
        });

        if let Some(error) = self.failures.write().await.remove(&action) {
            return Err(error);
        }

        Ok(ServiceOutput {
            action,
            command,
            output: format!("{} {}: ok\n", action, service),
        })
    }
}
