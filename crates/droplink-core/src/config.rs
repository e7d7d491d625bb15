//! Configuration module
//!
//! Env-driven configuration for the API and services: server port, upload
//! directory, pairing-code TTL and sweep cadence, and upload limits.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CODE_TTL_SECS: u64 = 600;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
const DEFAULT_MAX_FILE_SIZE_MB: usize = 10;
const DEFAULT_MAX_FILES_PER_UPLOAD: usize = 10;

/// Slack added on top of the per-request upload total for multipart framing
/// and text fields.
const BODY_LIMIT_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub upload_dir: PathBuf,
    /// Public base URL of this service, used to build stored-file URLs.
    pub base_url: String,
    pub code_ttl_secs: u64,
    pub sweep_interval_secs: u64,
    pub max_file_size_bytes: usize,
    pub max_files_per_upload: usize,
    pub allowed_content_types: Vec<String>,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            upload_dir: PathBuf::from("./uploads"),
            base_url: format!("http://localhost:{}", DEFAULT_PORT),
            code_ttl_secs: DEFAULT_CODE_TTL_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            max_files_per_upload: DEFAULT_MAX_FILES_PER_UPLOAD,
            allowed_content_types: vec!["image/*".to_string(), "application/pdf".to_string()],
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let defaults = Config::default();

        let server_port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.server_port);

        let config = Config {
            server_port,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", server_port)),
            code_ttl_secs: env::var("CODE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.code_ttl_secs),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval_secs),
            max_file_size_bytes: env::var("MAX_FILE_SIZE_MB")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .map(|mb| mb * 1024 * 1024)
                .unwrap_or(defaults.max_file_size_bytes),
            max_files_per_upload: env::var("MAX_FILES_PER_UPLOAD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_files_per_upload),
            allowed_content_types: env::var("ALLOWED_CONTENT_TYPES")
                .map(|v| parse_csv(&v))
                .unwrap_or(defaults.allowed_content_types),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|v| parse_csv(&v))
                .unwrap_or(defaults.cors_origins),
            environment: env::var("ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .unwrap_or(defaults.environment),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate invariants that would otherwise only surface at request time.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        anyhow::ensure!(self.code_ttl_secs > 0, "CODE_TTL_SECS must be positive");
        anyhow::ensure!(
            self.sweep_interval_secs > 0,
            "SWEEP_INTERVAL_SECS must be positive"
        );
        anyhow::ensure!(
            self.max_file_size_bytes > 0,
            "MAX_FILE_SIZE_MB must be positive"
        );
        anyhow::ensure!(
            self.max_files_per_upload > 0,
            "MAX_FILES_PER_UPLOAD must be positive"
        );
        anyhow::ensure!(
            !self.allowed_content_types.is_empty(),
            "ALLOWED_CONTENT_TYPES must not be empty"
        );
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn code_ttl(&self) -> Duration {
        Duration::from_secs(self.code_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Per-request body ceiling: every file at the per-file cap, plus framing slack.
    pub fn request_body_limit_bytes(&self) -> usize {
        self.max_file_size_bytes * self.max_files_per_upload + BODY_LIMIT_OVERHEAD_BYTES
    }

    /// Base URL under which stored files are served back to clients.
    pub fn uploads_base_url(&self) -> String {
        format!("{}/uploads", self.base_url.trim_end_matches('/'))
    }
}

fn parse_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
