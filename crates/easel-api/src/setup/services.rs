//! Service initialization and application state setup

use crate::state::AppState;
use anyhow::{Context, Result};
use easel_core::Config;
use easel_db::GenerationRepository;
use easel_services::{GeminiClient, GeminiClientConfig};
use easel_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Build the model client and repository, returning the application state
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let gemini = Arc::new(
        GeminiClient::new(GeminiClientConfig {
            api_base: config.gemini_api_base().to_string(),
            image_model: config.gemini_image_model().to_string(),
            text_model: config.gemini_text_model().to_string(),
            timeout: config.gemini_timeout_secs().map(Duration::from_secs),
        })
        .context("Failed to build Gemini client")?,
    );
    tracing::info!(
        image_model = %config.gemini_image_model(),
        text_model = %config.gemini_text_model(),
        "Gemini client initialized"
    );

    if config.gemini_api_key().is_none() {
        tracing::warn!(
            "GEMINI_API_KEY is not set - generate and enhance requests will fail until it is"
        );
    }

    let repository = Arc::new(GenerationRepository::new(pool));

    Ok(Arc::new(AppState::new(
        config.clone(),
        gemini.clone(),
        gemini,
        storage,
        repository,
    )))
}
