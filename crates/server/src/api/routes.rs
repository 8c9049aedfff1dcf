use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::state::AppState;

/// Builds the trigger router. Unlisted methods on a known path answer 405.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/update", post(handlers::trigger_update))
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::get_status))
        .route("/config", get(handlers::get_config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
