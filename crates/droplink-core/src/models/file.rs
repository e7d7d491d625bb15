use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Classification of an uploaded file, derived from the declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
}

impl FileKind {
    /// Classify a declared content type. Anything that is neither `image/*`
    /// nor `application/pdf` has no kind and must be rejected upstream.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        if content_type.starts_with("image/") {
            Some(FileKind::Image)
        } else if content_type == "application/pdf" {
            Some(FileKind::Pdf)
        } else {
            None
        }
    }
}

/// Metadata describing one successfully stored upload, independent of the
/// physical byte storage mechanism. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Collision-resistant name assigned at write time.
    pub stored_name: String,
    /// Client-supplied name, untrusted.
    pub original_name: String,
    pub kind: FileKind,
    pub uploaded_at: DateTime<Utc>,
    pub size_bytes: u64,
}
