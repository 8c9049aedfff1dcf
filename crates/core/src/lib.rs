pub mod config;
pub mod coordinator;
pub mod extractor;
pub mod fetcher;
pub mod registry;
pub mod resolver;
pub mod service;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, ApplicationConfig, Config, ConfigError,
    RegistryConfig, ServerConfig, ServiceConfig,
};
pub use coordinator::{
    AttemptSummary, BackupManager, FailureKind, UpdateCoordinator, UpdateError, UpdateReport,
    UpdateState,
};
pub use extractor::{ExtractError, PackageArchive};
pub use fetcher::{DownloadProgress, DownloadedArchive, FetchError, Fetcher, HttpFetcher};
pub use registry::{Artifact, ArtifactList, ArtifactRegistry, GithubRegistry, RegistryError};
pub use resolver::{resolve_artifact, ResolveError};
pub use service::{ServiceAction, ServiceError, ServiceManager, ServiceOutput, SystemctlManager};
