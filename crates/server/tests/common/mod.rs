//! Common test utilities for trigger API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! backed by a real coordinator with mock collaborators injected.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use updater_core::{
    testing::{MockFetcher, MockRegistry, MockServiceManager},
    Config, UpdateCoordinator,
};
use updater_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use updater_core::testing::fixtures;

/// Contents of the installed binary before any attempt.
pub const OLD_BINARY: &[u8] = b"installed v1";
/// Payload entry contents served by the mock fetcher.
pub const NEW_BINARY: &[u8] = b"built v2";

/// Test fixture for the trigger API.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_trigger() {
///     let fixture = TestFixture::new().await;
///     let response = fixture.post("/update").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    pub registry: MockRegistry,
    pub fetcher: MockFetcher,
    pub service: MockServiceManager,
    pub coordinator: Arc<UpdateCoordinator>,
    /// Installed binary path inside the temp dir
    pub app_path: PathBuf,
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

impl TestFixture {
    /// Fixture with service control disabled.
    pub async fn new() -> Self {
        Self::with_config(fixtures::test_config).await
    }

    /// Fixture with service control enabled.
    pub async fn with_service() -> Self {
        Self::with_config(fixtures::test_config_with_service).await
    }

    async fn with_config(config_for: fn(&std::path::Path) -> Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app_path = temp_dir.path().join("app.jar");
        std::fs::write(&app_path, OLD_BINARY).expect("Failed to write installed binary");

        let registry = MockRegistry::new();
        registry
            .set_artifacts(vec![fixtures::artifact(1, "app", "2024-01-01T00:00:00Z")])
            .await;

        let fetcher = MockFetcher::new();
        fetcher
            .set_archive(
                fixtures::zip_archive(&[("build/app.jar", NEW_BINARY)])
                    .expect("Failed to build archive"),
            )
            .await;

        let service = MockServiceManager::new();
        let config = config_for(&app_path);

        let coordinator = Arc::new(UpdateCoordinator::new(
            config.clone(),
            Arc::new(registry.clone()),
            Arc::new(fetcher.clone()),
            Arc::new(service.clone()),
        ));
        let state = Arc::new(AppState::new(config, Arc::clone(&coordinator)));
        let router = create_router(state);

        Self {
            router,
            registry,
            fetcher,
            service,
            coordinator,
            app_path,
            temp_dir,
        }
    }

    /// Send a GET request to the test router.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send an empty POST request.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path).await
    }

    /// Send a request with an empty body.
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            body: String::from_utf8_lossy(&body_bytes).into_owned(),
        }
    }

    /// Current installed binary contents.
    pub fn installed(&self) -> Vec<u8> {
        std::fs::read(&self.app_path).expect("Failed to read installed binary")
    }
}
