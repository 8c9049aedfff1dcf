//! Registry module for talking to the remote build-artifact registry.
//!
//! This module provides the `ArtifactRegistry` trait and a GitHub Actions
//! implementation. The registry lists artifacts and answers an artifact's
//! download reference with a redirect to the actual archive.
//!
//! # Example
//!
//! ```ignore
//! use updater_core::registry::{ArtifactRegistry, GithubRegistry};
//!
//! let registry = GithubRegistry::new(&config.registry, &token)?;
//! let list = registry.list_artifacts().await?;
//! let location = registry.download_location(&list.artifacts[0]).await?;
//! ```

mod error;
mod github;
mod traits;
mod types;

pub use error::RegistryError;
pub use github::GithubRegistry;
pub use traits::ArtifactRegistry;
pub use types::{Artifact, ArtifactList};
