//! GitHub Actions artifact registry implementation.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, LOCATION};
use reqwest::{redirect, Client, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

use crate::config::RegistryConfig;

use super::error::RegistryError;
use super::traits::ArtifactRegistry;
use super::types::{Artifact, ArtifactList};

const API_VERSION_HEADER: &str = "x-github-api-version";

/// GitHub Actions artifacts API client.
///
/// Redirects are never followed automatically: the download reference must
/// answer with a 302 whose Location is handed back to the caller.
pub struct GithubRegistry {
    client: Client,
    artifact_api: String,
}

impl GithubRegistry {
    /// Create a new client sending the configured headers and bearer token.
    pub fn new(config: &RegistryConfig, token: &str) -> Result<Self, RegistryError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept)
                .map_err(|_| RegistryError::InvalidHeader { header: "Accept" })?,
        );
        headers.insert(
            HeaderName::from_static(API_VERSION_HEADER),
            HeaderValue::from_str(&config.api_version).map_err(|_| {
                RegistryError::InvalidHeader {
                    header: "X-GitHub-Api-Version",
                }
            })?,
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            RegistryError::InvalidHeader {
                header: "Authorization",
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let mut builder = Client::builder()
            .default_headers(headers)
            .redirect(redirect::Policy::none());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| RegistryError::Client(e.to_string()))?;

        Ok(Self {
            client,
            artifact_api: config.artifact_api.clone(),
        })
    }
}

#[async_trait]
impl ArtifactRegistry for GithubRegistry {
    fn name(&self) -> &str {
        "github"
    }

    async fn list_artifacts(&self) -> Result<ArtifactList, RegistryError> {
        debug!(url = %self.artifact_api, "Requesting artifact list");

        let response = self
            .client
            .get(&self.artifact_api)
            .send()
            .await
            .map_err(|e| RegistryError::transport("GET", &self.artifact_api, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RegistryError::unexpected_status(
                "GET",
                &self.artifact_api,
                StatusCode::OK.as_u16(),
                status.as_u16(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RegistryError::transport("GET", &self.artifact_api, e))?;

        let list: ArtifactList =
            serde_json::from_str(&body).map_err(|e| RegistryError::InvalidBody(e.to_string()))?;

        debug!(
            total_count = list.total_count,
            returned = list.artifacts.len(),
            "Artifact list received"
        );

        Ok(list)
    }

    async fn download_location(&self, artifact: &Artifact) -> Result<Url, RegistryError> {
        let url = artifact.archive_download_url.as_str();
        debug!(artifact_id = artifact.id, url = %url, "Requesting artifact download url");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RegistryError::transport("GET", url, e))?;

        let status = response.status();
        if status != StatusCode::FOUND {
            return Err(RegistryError::unexpected_status(
                "GET",
                url,
                StatusCode::FOUND.as_u16(),
                status.as_u16(),
            ));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .ok_or_else(|| RegistryError::MissingLocation {
                url: url.to_string(),
                reason: "header absent".to_string(),
            })?
            .to_str()
            .map_err(|e| RegistryError::MissingLocation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        // Relative locations resolve against the request URL
        response
            .url()
            .join(location)
            .map_err(|e| RegistryError::MissingLocation {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}
