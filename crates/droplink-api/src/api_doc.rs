//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use droplink_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DropLink API",
        version = "0.1.0",
        description = "Pairing-code file drop service. A browser session generates a short-lived 6-digit code, other devices join it, and uploaded images/PDFs are associated with the code until it expires. All endpoints are versioned under /api/v0/."
    ),
    paths(
        // Pairing
        handlers::code_generate::generate_code,
        handlers::code_join::join_code,
        handlers::device_info::device_info,
        // Files
        handlers::file_upload::upload_files,
        handlers::file_list::list_files,
    ),
    components(schemas(
        models::CodeIssued,
        models::DeviceInfo,
        models::FileRecord,
        models::FileKind,
        handlers::code_join::JoinRequest,
        handlers::code_join::JoinResponse,
        handlers::file_upload::UploadResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "pairing", description = "Pairing code lifecycle"),
        (name = "files", description = "Upload and list files for a pairing code")
    )
)]
pub struct ApiDoc;

/// Returns the OpenAPI spec served at /api/openapi.json.
pub fn openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
