use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use droplink_core::AppError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct JoinRequest {
    /// 6-digit pairing code shown by the originating session
    #[validate(length(equal = 6, message = "code must be exactly 6 digits"))]
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JoinResponse {
    pub success: bool,
}

/// Join a device to an active pairing code. The join is counted; the join
/// record itself stays server-side.
#[utoipa::path(
    post,
    path = "/api/v0/codes/join",
    tag = "pairing",
    request_body = JoinRequest,
    responses(
        (status = 200, description = "Device joined", body = JoinResponse),
        (status = 400, description = "Malformed code", body = ErrorResponse),
        (status = 404, description = "Invalid or expired code", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "join_code"))]
pub async fn join_code(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<JoinRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    state.registry.join(&request.code)?;

    tracing::info!(code = %request.code, "Device joined pairing code");

    Ok(Json(JoinResponse { success: true }))
}
