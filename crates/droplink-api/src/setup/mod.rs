//! Application initialization: storage, registry, background sweep, routes.

pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::Router;

use crate::services::sweep::{SweepService, SweepServiceConfig};
use crate::state::{AppState, UploadConfig};
use droplink_core::{Config, PairingRegistry};
use droplink_storage::{LocalStorage, Storage};

/// Build application state, start the background sweep, and assemble the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(config.upload_dir.clone(), config.uploads_base_url()).await?,
    );
    tracing::info!(upload_dir = %config.upload_dir.display(), "Local storage initialized");

    let registry = Arc::new(PairingRegistry::new(config.code_ttl()));

    let sweep = SweepService::start(
        registry.clone(),
        storage.clone(),
        SweepServiceConfig {
            interval: config.sweep_interval(),
        },
    );

    let state = Arc::new(AppState {
        registry,
        storage,
        upload: UploadConfig::from_config(&config),
        config: config.clone(),
        sweep: Some(sweep),
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
