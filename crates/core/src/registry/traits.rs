//! Trait definitions for the registry module.

use async_trait::async_trait;
use reqwest::Url;

use super::error::RegistryError;
use super::types::{Artifact, ArtifactList};

/// A remote service that lists build artifacts and serves download redirects.
#[async_trait]
pub trait ArtifactRegistry: Send + Sync {
    /// Returns the name of this registry implementation.
    fn name(&self) -> &str;

    /// Fetches the artifact list exactly as the registry returns it.
    async fn list_artifacts(&self) -> Result<ArtifactList, RegistryError>;

    /// Resolves an artifact's download reference to the archive location.
    ///
    /// Follows exactly one redirect hop and never downloads the archive itself.
    async fn download_location(&self, artifact: &Artifact) -> Result<Url, RegistryError>;
}
