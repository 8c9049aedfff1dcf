//! Testing utilities and mock implementations.
//!
//! Mock collaborators for the update flow, so the coordinator and the
//! trigger API can be exercised without a registry or a service manager.
//!
//! # Example
//!
//! ```rust,ignore
//! use updater_core::testing::{fixtures, MockFetcher, MockRegistry, MockServiceManager};
//!
//! let registry = MockRegistry::new();
//! registry.set_artifacts(vec![fixtures::artifact(1, "app", "2024-01-01T00:00:00Z")]).await;
//!
//! let fetcher = MockFetcher::new();
//! fetcher.set_archive(fixtures::zip_archive(&[("build/app.jar", b"new")])?).await;
//!
//! let service = MockServiceManager::new();
//! ```

mod mock_fetcher;
mod mock_registry;
mod mock_service;

pub use mock_fetcher::MockFetcher;
pub use mock_registry::MockRegistry;
pub use mock_service::{MockServiceManager, RecordedCommand};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::io::{Cursor, Write};
    use std::path::Path;
    use zip::result::ZipResult;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use crate::config::{ApplicationConfig, Config, RegistryConfig, ServerConfig, ServiceConfig};
    use crate::registry::Artifact;

    /// Create a non-expired artifact.
    pub fn artifact(id: u64, name: &str, created_at: &str) -> Artifact {
        Artifact {
            id,
            name: name.to_string(),
            url: format!("https://registry.test/artifacts/{}", id),
            archive_download_url: format!("https://registry.test/artifacts/{}/zip", id),
            expired: false,
            created_at: created_at.to_string(),
        }
    }

    /// Create an expired artifact.
    pub fn expired_artifact(id: u64, name: &str, created_at: &str) -> Artifact {
        Artifact {
            expired: true,
            ..artifact(id, name, created_at)
        }
    }

    /// Build an in-memory zip archive with entries in the given order.
    pub fn zip_archive(entries: &[(&str, &[u8])]) -> ZipResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default())?;
            writer.write_all(content)?;
        }
        Ok(writer.finish()?.into_inner())
    }

    /// Configuration installing `build/*.jar` entries of artifact `app` to
    /// `app_path`, service control disabled.
    pub fn test_config(app_path: &Path) -> Config {
        Config {
            registry: RegistryConfig::new("https://registry.test/artifacts", "app"),
            application: ApplicationConfig::new(app_path, "build/", ".jar"),
            service: ServiceConfig::default(),
            server: ServerConfig::default(),
        }
    }

    /// Like [`test_config`] with service control enabled for `app.service`
    /// and no settle delay.
    pub fn test_config_with_service(app_path: &Path) -> Config {
        let mut config = test_config(app_path);
        config.service = ServiceConfig {
            enabled: true,
            name: "app.service".to_string(),
            settle_delay_secs: 0,
            ..ServiceConfig::default()
        };
        config
    }
}
