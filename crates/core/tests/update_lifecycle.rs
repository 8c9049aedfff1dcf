//! Update lifecycle integration tests.
//!
//! These tests drive a full attempt through the real HTTP registry client and
//! fetcher against an in-process registry emulator:
//! list -> 302 redirect -> payload -> backup -> replace -> extract

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tempfile::TempDir;

use updater_core::{
    testing::{fixtures, MockServiceManager},
    FailureKind, GithubRegistry, HttpFetcher, UpdateCoordinator, UpdateState,
};

const TOKEN: &str = "test-token";
const OLD: &[u8] = b"installed v1";
const NEW: &[u8] = b"freshly built v2";

#[derive(Clone)]
struct Emulator {
    base: String,
    archive: Arc<Vec<u8>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

async fn list_artifacts(State(emulator): State<Emulator>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "total_count": 1,
        "artifacts": [{
            "id": 11,
            "name": "app",
            "url": format!("{}/artifacts/11", emulator.base),
            "archive_download_url": format!("{}/artifacts/11/zip", emulator.base),
            "expired": false,
            "created_at": "2024-01-01T00:00:00Z"
        }]
    }))
    .into_response()
}

async fn redirect(State(emulator): State<Emulator>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    (
        StatusCode::FOUND,
        [(header::LOCATION, format!("{}/blob/app.zip", emulator.base))],
    )
        .into_response()
}

async fn payload(State(emulator): State<Emulator>, headers: HeaderMap) -> Response {
    // Payload host must not receive registry credentials
    if headers.contains_key(header::AUTHORIZATION) {
        return StatusCode::BAD_REQUEST.into_response();
    }
    (StatusCode::OK, emulator.archive.as_ref().clone()).into_response()
}

async fn spawn_emulator(archive: Vec<u8>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind emulator");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));
    let emulator = Emulator {
        base: base.clone(),
        archive: Arc::new(archive),
    };
    let router = Router::new()
        .route("/artifacts", get(list_artifacts))
        .route("/artifacts/{id}/zip", get(redirect))
        .route("/blob/app.zip", get(payload))
        .with_state(emulator);
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("emulator server");
    });
    base
}

struct TestHarness {
    app_path: std::path::PathBuf,
    service: MockServiceManager,
    coordinator: UpdateCoordinator,
    _temp_dir: TempDir,
}

impl TestHarness {
    async fn new(archive: Vec<u8>, token: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app_path = temp_dir.path().join("app.jar");
        std::fs::write(&app_path, OLD).expect("Failed to write installed binary");

        let base = spawn_emulator(archive).await;
        let mut config = fixtures::test_config(&app_path);
        config.registry.artifact_api = format!("{}/artifacts", base);

        let registry = Arc::new(
            GithubRegistry::new(&config.registry, token).expect("Failed to create registry"),
        );
        let fetcher =
            Arc::new(HttpFetcher::new(registry.clone(), None).expect("Failed to create fetcher"));
        let service = MockServiceManager::new();
        let coordinator =
            UpdateCoordinator::new(config, registry, fetcher, Arc::new(service.clone()));

        Self {
            app_path,
            service,
            coordinator,
            _temp_dir: temp_dir,
        }
    }
}

#[tokio::test]
async fn test_update_end_to_end() {
    let archive = fixtures::zip_archive(&[("build/app.jar", NEW)]).unwrap();
    let harness = TestHarness::new(archive, TOKEN).await;

    let report = harness.coordinator.run().await.expect("update should succeed");

    assert_eq!(report.artifact.id, 11);
    assert_eq!(report.artifact.created_at, "2024-01-01T00:00:00Z");
    assert_eq!(report.payload_entry, "build/app.jar");
    assert_eq!(report.state, UpdateState::Completed);
    assert_eq!(std::fs::read(&harness.app_path).unwrap(), NEW);
    assert!(harness.service.recorded_commands().await.is_empty());
    assert_eq!(harness.coordinator.state().await, UpdateState::Completed);
}

#[tokio::test]
async fn test_bad_token_fails_before_touching_disk() {
    let archive = fixtures::zip_archive(&[("build/app.jar", NEW)]).unwrap();
    let harness = TestHarness::new(archive, "wrong-token").await;

    let err = harness.coordinator.run().await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::UnexpectedResponse);
    assert_eq!(std::fs::read(&harness.app_path).unwrap(), OLD);
    assert!(!harness.coordinator.backup().backup_path().exists());
}

#[tokio::test]
async fn test_archive_without_payload_rolls_back() {
    let archive = fixtures::zip_archive(&[("docs/readme.txt", b"hello")]).unwrap();
    let harness = TestHarness::new(archive, TOKEN).await;

    let err = harness.coordinator.run().await.unwrap_err();

    assert!(err.is_rolled_back());
    assert_eq!(err.kind(), FailureKind::PayloadNotFound);
    assert_eq!(std::fs::read(&harness.app_path).unwrap(), OLD);
    assert_eq!(harness.coordinator.state().await, UpdateState::RolledBack);
}
