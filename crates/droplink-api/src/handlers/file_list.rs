use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use droplink_core::models::FileRecord;

#[derive(Debug, Deserialize)]
pub struct CodeQuery {
    pub code: String,
}

/// List the files uploaded under a pairing code, in upload order.
#[utoipa::path(
    get,
    path = "/api/v0/files",
    tag = "files",
    params(
        ("code" = String, Query, description = "Pairing code")
    ),
    responses(
        (status = 200, description = "Stored file records", body = [FileRecord]),
        (status = 404, description = "Invalid or expired code", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_files", code = %query.code))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CodeQuery>,
) -> Result<Json<Vec<FileRecord>>, HttpAppError> {
    let records = state.registry.list(&query.code)?;
    Ok(Json(records))
}
