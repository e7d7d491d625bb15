use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use droplink_core::models::CodeIssued;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Generate a fresh pairing code for the requesting browser session.
#[utoipa::path(
    post,
    path = "/api/v0/codes",
    tag = "pairing",
    responses(
        (status = 201, description = "Pairing code generated", body = CodeIssued),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "generate_code"))]
pub async fn generate_code(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let issued = state.registry.generate()?;

    tracing::info!(code = %issued.code, expires_at = %issued.expires_at, "Pairing code generated");

    Ok((StatusCode::CREATED, Json(issued)))
}
