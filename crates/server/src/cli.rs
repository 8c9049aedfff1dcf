//! Command line interface.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use updater_core::Config;

/// Downloads the newest build artifact and installs it in place of the
/// running application.
#[derive(Debug, Parser)]
#[command(name = "updater", version)]
pub struct Cli {
    /// Registry access token. Takes precedence over --token-file.
    #[arg(short = 't', long)]
    pub token: Option<String>,

    /// File holding the registry access token
    #[arg(long, default_value = ".pat")]
    pub token_file: PathBuf,

    /// Configuration file (TOML, or JSON when it ends in .json)
    #[arg(short = 'c', long, default_value = "updater.toml")]
    pub config: PathBuf,

    /// Listen for update triggers instead of updating once
    #[arg(long)]
    pub server: bool,

    /// Trigger listener port (overrides server.port)
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Trigger listener address (overrides server.host)
    #[arg(long)]
    pub host: Option<IpAddr>,
}

impl Cli {
    /// Returns the access token, trimmed, from the flag or the token file.
    pub fn read_token(&self) -> Result<String> {
        let token = match &self.token {
            Some(token) => token.trim().to_string(),
            None => std::fs::read_to_string(&self.token_file)
                .with_context(|| {
                    format!("Failed to read token file {}", self.token_file.display())
                })?
                .trim()
                .to_string(),
        };

        if token.is_empty() {
            bail!("Access token is empty");
        }
        Ok(token)
    }

    /// Applies listener overrides from the command line.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use updater_core::testing::fixtures;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["updater"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("updater.toml"));
        assert_eq!(cli.token_file, PathBuf::from(".pat"));
        assert!(!cli.server);
        assert!(cli.port.is_none());
    }

    #[test]
    fn test_short_flags() {
        let cli =
            Cli::try_parse_from(["updater", "-t", "abc", "-c", "updater.json", "-p", "9000", "--server"])
                .unwrap();
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert_eq!(cli.config, PathBuf::from("updater.json"));
        assert_eq!(cli.port, Some(9000));
        assert!(cli.server);
    }

    #[test]
    fn test_token_flag_is_trimmed() {
        let cli = Cli::try_parse_from(["updater", "--token", "  abc \n"]).unwrap();
        assert_eq!(cli.read_token().unwrap(), "abc");
    }

    #[test]
    fn test_token_file_is_trimmed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ghp_secret").unwrap();
        let cli = Cli::try_parse_from([
            "updater",
            "--token-file",
            file.path().to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(cli.read_token().unwrap(), "ghp_secret");
    }

    #[test]
    fn test_empty_token_rejected() {
        let file = NamedTempFile::new().unwrap();
        let cli = Cli::try_parse_from([
            "updater",
            "--token-file",
            file.path().to_str().unwrap(),
        ])
        .unwrap();
        assert!(cli.read_token().is_err());
    }

    #[test]
    fn test_missing_token_file() {
        let cli = Cli::try_parse_from(["updater", "--token-file", "/nonexistent/.pat"]).unwrap();
        let err = cli.read_token().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/.pat"));
    }

    #[test]
    fn test_apply_overrides() {
        let cli = Cli::try_parse_from(["updater", "-p", "8123", "--host", "0.0.0.0"]).unwrap();
        let mut config = fixtures::test_config(std::path::Path::new("app.jar"));
        cli.apply_overrides(&mut config);
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
    }
}
