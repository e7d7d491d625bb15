//! Storage abstraction trait
//!
//! This module defines the Storage trait that storage backends must implement.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Handlers and the sweep service work against this trait rather than a
/// concrete filesystem layout.
///
/// **Key format:** keys are code-scoped: `{code}/{stored_name}`. See
/// [`crate::keys`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store uploaded bytes under the code's directory and return
    /// (storage_key, storage_url).
    ///
    /// The storage_key is the internal identifier used to reference the file;
    /// the storage_url is the publicly accessible URL to it.
    async fn upload(
        &self,
        code: &str,
        stored_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)>;

    /// Download a file by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a file by its storage key
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Remove a code's entire upload directory. Used by the expiry sweep to
    /// cascade from metadata removal to the stored bytes.
    async fn delete_code_dir(&self, code: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the size in bytes of a stored file, if it exists.
    async fn content_length(&self, storage_key: &str) -> StorageResult<u64>;
}
