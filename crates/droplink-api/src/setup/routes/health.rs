//! Health check handlers and response types.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::state::AppState;

const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, T, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(_)) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
struct ReadinessResponse {
    status: String,
    storage: String,
    active_codes: usize,
}

pub(super) fn health_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(liveness_check))
        .route("/health/ready", get(readiness_check))
        .with_state(state)
}

/// Liveness probe - process is running.
async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the storage backend must be reachable.
async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let storage = run_check(
        CHECK_TIMEOUT,
        state.storage.exists("readiness-probe"),
        "storage error",
    )
    .await;

    let ready = storage == "healthy";
    let status = if ready { "ready" } else { "degraded" };

    let response = ReadinessResponse {
        status: status.to_string(),
        storage,
        active_codes: state.registry.active_codes(),
    };

    let code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(response))
}
