use std::sync::Arc;
use updater_core::{Config, UpdateCoordinator};

/// Shared application state
pub struct AppState {
    config: Config,
    coordinator: Arc<UpdateCoordinator>,
}

impl AppState {
    pub fn new(config: Config, coordinator: Arc<UpdateCoordinator>) -> Self {
        Self {
            config,
            coordinator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn coordinator(&self) -> &Arc<UpdateCoordinator> {
        &self.coordinator
    }
}
