//! Application state injected into handlers.
//!
//! The registry is an owned, explicitly-lifetimed object handed to handlers
//! through Axum state, never ambient global state. Upload limits are split
//! into a sub-state so handlers can extract only what they need via `FromRef`.

use droplink_core::{Config, PairingRegistry};
use droplink_storage::Storage;
use std::sync::Arc;

use crate::services::sweep::SweepService;

/// Upload limits and content-type allowlist.
#[derive(Clone)]
pub struct UploadConfig {
    pub max_file_size: usize,
    pub max_files_per_upload: usize,
    pub allowed_content_types: Vec<String>,
}

impl UploadConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_file_size: config.max_file_size_bytes,
            max_files_per_upload: config.max_files_per_upload,
            allowed_content_types: config.allowed_content_types.clone(),
        }
    }

    /// Content-type check supporting `image/*`-style wildcards.
    pub fn is_allowed_content_type(&self, content_type: &str) -> bool {
        self.allowed_content_types.iter().any(|allowed| {
            match allowed.strip_suffix("/*") {
                Some(prefix) => {
                    content_type.len() > prefix.len() + 1
                        && content_type.starts_with(prefix)
                        && content_type.as_bytes()[prefix.len()] == b'/'
                }
                None => allowed.eq_ignore_ascii_case(content_type),
            }
        })
    }
}

/// Main application state: aggregates the registry, storage backend, and
/// configuration for dependency injection.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<PairingRegistry>,
    pub storage: Arc<dyn Storage>,
    pub upload: UploadConfig,
    pub config: Config,
    /// Handle to the background expiry sweep; absent in tests that drive
    /// sweeps manually.
    pub sweep: Option<SweepService>,
}

impl axum::extract::FromRef<Arc<AppState>> for UploadConfig {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.upload.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
