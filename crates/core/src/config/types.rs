use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub registry: RegistryConfig,
    pub application: ApplicationConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Artifact registry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// Artifact list endpoint (e.g. "https://api.github.com/repos/o/r/actions/artifacts")
    pub artifact_api: String,
    /// Name of the artifact to install
    pub artifact_name: String,
    /// Value of the Accept header sent to the registry
    #[serde(default = "default_accept")]
    pub accept: String,
    /// Value of the X-GitHub-Api-Version header
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Request timeout in seconds. Unset means transport defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_accept() -> String {
    "application/vnd.github+json".to_string()
}

fn default_api_version() -> String {
    "2022-11-28".to_string()
}

impl RegistryConfig {
    pub fn new(artifact_api: impl Into<String>, artifact_name: impl Into<String>) -> Self {
        Self {
            artifact_api: artifact_api.into(),
            artifact_name: artifact_name.into(),
            accept: default_accept(),
            api_version: default_api_version(),
            timeout_secs: None,
        }
    }
}

/// Installed application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApplicationConfig {
    /// Path of the installed binary that gets replaced
    pub path: PathBuf,
    /// Archive entry name prefix identifying the payload
    #[serde(default)]
    pub updated_prefix: String,
    /// Archive entry name suffix identifying the payload
    #[serde(default)]
    pub updated_suffix: String,
    /// Suffix appended to `path` for the backup copy
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,
}

fn default_backup_suffix() -> String {
    ".backup".to_string()
}

impl ApplicationConfig {
    pub fn new(
        path: impl Into<PathBuf>,
        updated_prefix: impl Into<String>,
        updated_suffix: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            updated_prefix: updated_prefix.into(),
            updated_suffix: updated_suffix.into(),
            backup_suffix: default_backup_suffix(),
        }
    }
}

/// Background service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub name: String,
    /// Service manager executable
    #[serde(default = "default_manager_path")]
    pub manager_path: PathBuf,
    /// Pause between `start` and the `status` check
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            name: String::new(),
            manager_path: default_manager_path(),
            settle_delay_secs: default_settle_delay(),
        }
    }
}

impl ServiceConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }
}

fn default_manager_path() -> PathBuf {
    PathBuf::from("systemctl")
}

fn default_settle_delay() -> u64 {
    4
}

/// Trigger listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    7400
}
