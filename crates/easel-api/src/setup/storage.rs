//! Storage setup and initialization

use anyhow::{Context, Result};
use easel_core::Config;
use easel_storage::{create_storage, Storage};
use std::sync::Arc;

/// Build the configured storage backend.
///
/// Reachability is not probed here; `/health/ready` reports it.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(
        backend = %storage.backend_type(),
        "Storage abstraction initialized successfully"
    );
    Ok(storage)
}
