//! Mock artifact registry for testing.

use async_trait::async_trait;
use reqwest::Url;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::registry::{Artifact, ArtifactList, ArtifactRegistry, RegistryError};

/// Mock implementation of the ArtifactRegistry trait.
///
/// Serves a fixed artifact list and a fixed download location.
#[derive(Debug, Clone)]
pub struct MockRegistry {
    artifacts: Arc<RwLock<Vec<Artifact>>>,
    location: Arc<RwLock<Url>>,
    /// If set, the next list request fails with this error.
    next_error: Arc<RwLock<Option<RegistryError>>>,
    list_calls: Arc<RwLock<usize>>,
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRegistry {
    pub fn new() -> Self {
        let location = Url::parse("https://payload.test/artifact.zip").expect("static url");
        Self {
            artifacts: Arc::new(RwLock::new(Vec::new())),
            location: Arc::new(RwLock::new(location)),
            next_error: Arc::new(RwLock::new(None)),
            list_calls: Arc::new(RwLock::new(0)),
        }
    }

    /// Set the artifacts returned by the next list requests.
    pub async fn set_artifacts(&self, artifacts: Vec<Artifact>) {
        *self.artifacts.write().await = artifacts;
    }

    /// Set the location every download reference redirects to.
    pub async fn set_location(&self, location: Url) {
        *self.location.write().await = location;
    }

    /// Make the next list request fail.
    pub async fn fail_next_list(&self, error: RegistryError) {
        *self.next_error.write().await = Some(error);
    }

    /// Number of list requests served.
    pub async fn list_calls(&self) -> usize {
        *self.list_calls.read().await
    }
}

#[async_trait]
impl ArtifactRegistry for MockRegistry {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_artifacts(&self) -> Result<ArtifactList, RegistryError> {
        *self.list_calls.write().await += 1;
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        let artifacts = self.artifacts.read().await.clone();
        Ok(ArtifactList {
            total_count: artifacts.len() as u64,
            artifacts,
        })
    }

    async fn download_location(&self, _artifact: &Artifact) -> Result<Url, RegistryError> {
        Ok(self.location.read().await.clone())
    }
}
