//! Periodic expiry sweep.
//!
//! Modeled as a scheduled task sharing the registry's lock discipline with
//! request handlers: each pass goes through the registry's public sweep
//! operation, then deletes the swept codes' upload directories. Never an
//! unsynchronized background loop over the maps.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::interval;

use droplink_core::PairingRegistry;
use droplink_storage::Storage;

/// Configuration for the sweep service
#[derive(Clone)]
pub struct SweepServiceConfig {
    pub interval: Duration,
}

impl Default for SweepServiceConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

/// What one sweep pass removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SweepOutcome {
    pub codes_removed: usize,
    pub files_removed: usize,
}

/// Background service that expires pairing codes and their stored bytes
#[derive(Clone)]
pub struct SweepService {
    shutdown_tx: mpsc::Sender<()>,
}

impl SweepService {
    pub fn start(
        registry: Arc<PairingRegistry>,
        storage: Arc<dyn Storage>,
        config: SweepServiceConfig,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        tokio::spawn(async move {
            Self::worker_loop(registry, storage, config, shutdown_rx).await;
        });

        Self { shutdown_tx }
    }

    /// Main worker loop
    async fn worker_loop(
        registry: Arc<PairingRegistry>,
        storage: Arc<dyn Storage>,
        config: SweepServiceConfig,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        let mut tick = interval(config.interval);

        tracing::info!(
            interval_secs = config.interval.as_secs(),
            ttl_secs = registry.ttl().num_seconds(),
            "Expiry sweep started"
        );

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let outcome = sweep_once(&registry, storage.as_ref()).await;
                    if outcome.codes_removed > 0 {
                        tracing::info!(
                            codes_removed = outcome.codes_removed,
                            files_removed = outcome.files_removed,
                            active_codes = registry.active_codes(),
                            "Swept expired pairing codes"
                        );
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Expiry sweep shutting down");
                    break;
                }
            }
        }
    }

    /// Stop the worker loop.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// One sweep pass: expire codes in the registry, then drop their bytes.
/// Directory deletion failures are logged and skipped; the metadata is
/// already gone and a later pass cannot retry it, so the warning is the
/// operator's signal.
pub async fn sweep_once(registry: &PairingRegistry, storage: &dyn Storage) -> SweepOutcome {
    let swept = registry.sweep_expired(chrono::Utc::now());

    let mut outcome = SweepOutcome {
        codes_removed: swept.len(),
        files_removed: 0,
    };

    for entry in swept {
        outcome.files_removed += entry.file_count;
        if let Err(e) = storage.delete_code_dir(&entry.code).await {
            tracing::warn!(
                error = %e,
                code = %entry.code,
                "Failed to delete upload directory for expired code"
            );
        }
    }

    outcome
}
