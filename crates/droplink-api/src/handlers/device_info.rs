use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use droplink_core::models::DeviceInfo;

#[derive(Debug, Deserialize)]
pub struct CodeQuery {
    pub code: String,
}

/// Report how many devices joined a pairing code and when it was created.
#[utoipa::path(
    get,
    path = "/api/v0/devices",
    tag = "pairing",
    params(
        ("code" = String, Query, description = "Pairing code")
    ),
    responses(
        (status = 200, description = "Join-count summary", body = DeviceInfo),
        (status = 404, description = "Invalid or expired code", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "device_info", code = %query.code))]
pub async fn device_info(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CodeQuery>,
) -> Result<Json<DeviceInfo>, HttpAppError> {
    let info = state.registry.info(&query.code)?;
    Ok(Json(info))
}
