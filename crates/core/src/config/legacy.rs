use serde::Deserialize;
use std::path::PathBuf;

use super::types::{ApplicationConfig, Config, RegistryConfig, ServerConfig, ServiceConfig};

/// Flat camelCase JSON layout of older `updater.json` files.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyConfig {
    pub artifact_api: String,
    pub artifact_name: String,
    pub application_file_name: PathBuf,
    #[serde(default)]
    pub updated_prefix: String,
    #[serde(default)]
    pub updated_suffix: String,
    #[serde(default, alias = "Service")]
    pub service: LegacyService,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyService {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub name: String,
}

impl LegacyConfig {
    /// Whether a JSON document uses the flat layout.
    pub fn detect(value: &serde_json::Value) -> bool {
        value.get("artifactApi").is_some()
    }
}

impl From<LegacyConfig> for Config {
    fn from(legacy: LegacyConfig) -> Self {
        Config {
            registry: RegistryConfig::new(legacy.artifact_api, legacy.artifact_name),
            application: ApplicationConfig::new(
                legacy.application_file_name,
                legacy.updated_prefix,
                legacy.updated_suffix,
            ),
            service: ServiceConfig {
                enabled: legacy.service.enabled,
                name: legacy.service.name,
                ..ServiceConfig::default()
            },
            server: ServerConfig::default(),
        }
    }
}
