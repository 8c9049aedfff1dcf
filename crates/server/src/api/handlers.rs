use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;
use updater_core::{AttemptSummary, Config, UpdateState};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<Config> {
    Json(state.config().clone())
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub state: UpdateState,
    pub in_progress: bool,
    pub last_outcome: Option<AttemptSummary>,
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let coordinator = state.coordinator();
    let current = coordinator.state().await;
    Json(StatusResponse {
        state: current,
        in_progress: current.is_active(),
        last_outcome: coordinator.last_outcome().await,
    })
}

/// Runs one update attempt.
///
/// The attempt runs in its own task so a panic inside it becomes a 500 and
/// the listener keeps serving.
pub async fn trigger_update(State(state): State<Arc<AppState>>) -> (StatusCode, String) {
    let coordinator = Arc::clone(state.coordinator());
    let attempt = tokio::spawn(async move { coordinator.run().await });

    match attempt.await {
        Ok(Ok(_)) => (StatusCode::OK, "OK\n".to_string()),
        Ok(Err(e)) if e.is_busy() => (StatusCode::CONFLICT, format!("BUSY: {}\n", e)),
        Ok(Err(e)) => (StatusCode::INTERNAL_SERVER_ERROR, format!("ERROR: {}\n", e)),
        Err(e) => {
            error!(error = %e, "Update task aborted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("ERROR: update task aborted: {}\n", e),
            )
        }
    }
}
