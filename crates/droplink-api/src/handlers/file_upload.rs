use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::{AppState, UploadConfig};
use droplink_core::models::{FileKind, FileRecord};
use droplink_core::AppError;
use droplink_storage::keys;

/// One multipart file part, buffered and validated but not yet written.
struct StagedFile {
    original_name: String,
    content_type: String,
    kind: FileKind,
    data: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub uploaded: usize,
    pub files: Vec<FileRecord>,
}

/// Upload files handler
///
/// Accepts a multipart form with a `device_code` text field and up to the
/// configured number of `files` parts. Bytes are written to the code's
/// storage directory, then the records are appended to the registry's ledger
/// in arrival order. If the code expires between the write and the append,
/// the freshly written files are removed again.
///
/// # Errors
/// - `AppError::InvalidCode` - Code absent or expired (HTTP 404)
/// - `AppError::InvalidInput` - Missing code/files, too many files, disallowed content type
/// - `AppError::PayloadTooLarge` - A file exceeds the per-file ceiling
/// - `AppError::Storage` - Storage write failure
#[utoipa::path(
    post,
    path = "/api/v0/files",
    tag = "files",
    responses(
        (status = 201, description = "Files uploaded", body = UploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Invalid or expired code", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_files"))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut device_code: Option<String> = None;
    let mut staged: Vec<StagedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart request: {}", e)))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("device_code") => {
                let code = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Invalid device_code field: {}", e))
                })?;
                device_code = Some(code.trim().to_string());
            }
            Some("files") => {
                if staged.len() >= state.upload.max_files_per_upload {
                    return Err(AppError::InvalidInput(format!(
                        "Too many files: at most {} per upload",
                        state.upload.max_files_per_upload
                    ))
                    .into());
                }
                staged.push(stage_file(&state.upload, field).await?);
            }
            _ => {
                // Unknown fields are drained and ignored, like any tolerant
                // multipart consumer.
                let _ = field.bytes().await;
            }
        }
    }

    let code = device_code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing device_code field".to_string()))?;

    if staged.is_empty() {
        return Err(AppError::InvalidInput("No files were uploaded".to_string()).into());
    }

    // Fail fast before writing any bytes; the authoritative check happens
    // atomically in record_upload below.
    state.registry.info(&code)?;

    let mut records = Vec::with_capacity(staged.len());
    let mut written_keys = Vec::with_capacity(staged.len());
    for file in staged {
        let stored_name = keys::generate_stored_name(&file.original_name);
        let size_bytes = file.data.len() as u64;
        let (key, _url) = match state
            .storage
            .upload(&code, &stored_name, &file.content_type, file.data)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                // Earlier files of this batch are already on disk; drop them
                // rather than leaving a half-recorded batch behind.
                spawn_cleanup(state.storage.clone(), written_keys);
                return Err(e.into());
            }
        };
        written_keys.push(key);
        records.push(FileRecord {
            stored_name,
            original_name: file.original_name,
            kind: file.kind,
            uploaded_at: Utc::now(),
            size_bytes,
        });
    }

    if let Err(e) = state.registry.record_upload(&code, records.clone()) {
        // The code expired between the storage writes and the ledger append.
        spawn_cleanup(state.storage.clone(), written_keys);
        return Err(e.into());
    }

    tracing::info!(
        code = %code,
        uploaded = records.len(),
        "Files uploaded and recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Files uploaded successfully".to_string(),
            uploaded: records.len(),
            files: records,
        }),
    ))
}

/// Best-effort deletion of already-written files after a failed upload.
fn spawn_cleanup(storage: Arc<dyn droplink_storage::Storage>, written_keys: Vec<String>) {
    tokio::spawn(async move {
        for key in written_keys {
            if let Err(cleanup_err) = storage.delete(&key).await {
                tracing::warn!(
                    error = %cleanup_err,
                    storage_key = %key,
                    "Failed to clean up stored file after upload failure"
                );
            }
        }
    });
}

/// Validate and buffer a single `files` part.
async fn stage_file(
    upload: &UploadConfig,
    field: axum::extract::multipart::Field<'_>,
) -> Result<StagedFile, HttpAppError> {
    let original_name = field
        .file_name()
        .map(str::to_string)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::InvalidInput("File part is missing a filename".to_string()))?;

    let content_type = field
        .content_type()
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::InvalidInput(format!("File '{}' is missing a content type", original_name))
        })?;

    if !upload.is_allowed_content_type(&content_type) {
        return Err(AppError::InvalidInput(format!(
            "Content type '{}' is not allowed; only images and PDF files are accepted",
            content_type
        ))
        .into());
    }

    // Content types passing the allowlist but without a kind (a widened
    // ALLOWED_CONTENT_TYPES) are still rejected: the ledger only knows
    // images and PDFs.
    let kind = FileKind::from_content_type(&content_type).ok_or_else(|| {
        AppError::InvalidInput(format!("Unsupported content type '{}'", content_type))
    })?;

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read file part: {}", e)))?;

    if data.is_empty() {
        return Err(AppError::InvalidInput(format!("File '{}' is empty", original_name)).into());
    }

    if data.len() > upload.max_file_size {
        return Err(AppError::PayloadTooLarge(format!(
            "{} bytes exceeds max {} bytes",
            data.len(),
            upload.max_file_size
        ))
        .into());
    }

    Ok(StagedFile {
        original_name,
        content_type,
        kind,
        data: data.to_vec(),
    })
}
