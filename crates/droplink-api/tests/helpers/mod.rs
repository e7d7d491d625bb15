#![allow(dead_code)] // Each test binary uses a different subset of helpers

use std::sync::Arc;

use axum_test::TestServer;
use tempfile::TempDir;

use droplink_api::setup::routes::setup_routes;
use droplink_api::state::{AppState, UploadConfig};
use droplink_core::{Config, PairingRegistry};
use droplink_storage::{LocalStorage, Storage};

/// Test application state
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup a test application with an isolated temp upload directory
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(Config::default()).await
}

/// Same, but with caller-controlled TTLs and limits. The upload directory is
/// always replaced with a fresh temp dir.
pub async fn setup_test_app_with(mut config: Config) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    config.upload_dir = temp_dir.path().to_path_buf();

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(config.upload_dir.clone(), config.uploads_base_url())
            .await
            .expect("create storage"),
    );
    let registry = Arc::new(PairingRegistry::new(config.code_ttl()));

    // No background sweep in tests; sweep passes are driven explicitly.
    let state = Arc::new(AppState {
        registry,
        storage,
        upload: UploadConfig::from_config(&config),
        config: config.clone(),
        sweep: None,
    });

    let router = setup_routes(&config, state.clone()).expect("build router");
    let server = TestServer::new(router).expect("start test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

/// Returns the versioned API path.
/// Usage: `api_path("/codes")` -> `/api/v0/codes`.
pub fn api_path(path: &str) -> String {
    format!("{}{}", droplink_api::constants::API_PREFIX, path)
}

/// Generate a pairing code through the API and return it.
pub async fn generate_code(app: &TestApp) -> String {
    let response = app.client().post(&api_path("/codes")).await;
    assert_eq!(response.status_code(), 201);
    let body: serde_json::Value = response.json();
    body.get("code")
        .and_then(|v| v.as_str())
        .expect("code in response")
        .to_string()
}

/// A minimal valid 1x1 PNG.
pub const TEST_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 dimensions
    0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44,
    0x41, 0x54, // IDAT chunk
    0x08, 0xD7, 0x63, 0xF8, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D,
    0x89, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60,
    0x82, // IEND chunk
];
