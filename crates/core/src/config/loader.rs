use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{legacy::LegacyConfig, types::Config, ConfigError};

/// Prefix for environment variable overrides (`UPDATER_SERVICE__NAME=...`)
const ENV_PREFIX: &str = "UPDATER_";

/// Load configuration from file with environment variable overrides.
///
/// Files ending in `.json` are read as JSON, everything else as TOML. JSON
/// files in the older flat layout are converted first.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let figment = if is_json {
        match read_legacy(path)? {
            Some(legacy) => Figment::from(Serialized::defaults(Config::from(legacy))),
            None => Figment::new().merge(Json::file(path)),
        }
    } else {
        Figment::new().merge(Toml::file(path))
    };

    let config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Parses `path` as a legacy config if it uses the flat layout.
fn read_legacy(path: &Path) -> Result<Option<LegacyConfig>, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    if !LegacyConfig::detect(&value) {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
