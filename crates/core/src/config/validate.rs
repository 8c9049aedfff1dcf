use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Registry endpoint and artifact name are set
/// - Application path is set
/// - An enabled service has a name
/// - Server port is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.registry.artifact_api.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "registry.artifact_api cannot be empty".to_string(),
        ));
    }

    if config.registry.artifact_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "registry.artifact_name cannot be empty".to_string(),
        ));
    }

    if config.application.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "application.path cannot be empty".to_string(),
        ));
    }

    if config.service.enabled && config.service.name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "service.name is required when service.enabled = true".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    Ok(())
}
