//! Application state and sub-state extractors.
//!
//! AppState is split into sub-states so handlers can extract only what they need
//! via Axum's `FromRef`. Every client is built once at startup and shared
//! read-only across requests; the key clock is the only mutable piece and it is
//! an atomic.

use easel_core::{ApiKey, Config};
use easel_db::GenerationRecorder;
use easel_services::{ImageGenerator, PromptEnhancer};
use easel_storage::{KeyClock, Storage};
use std::sync::Arc;

// ----- Sub-state types -----

/// Clients for the generative model provider.
#[derive(Clone)]
pub struct ModelState {
    pub generator: Arc<dyn ImageGenerator>,
    pub enhancer: Arc<dyn PromptEnhancer>,
    /// `None` when no key is configured; requests report it instead of startup.
    pub api_key: Option<ApiKey>,
}

/// Object storage and the clock that timestamps its keys.
#[derive(Clone)]
pub struct MediaState {
    pub storage: Arc<dyn Storage>,
    pub key_clock: Arc<KeyClock>,
}

/// Generation metadata persistence.
#[derive(Clone)]
pub struct DbState {
    pub recorder: Arc<dyn GenerationRecorder>,
}

// ----- AppState -----

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub models: ModelState,
    pub media: MediaState,
    pub db: DbState,
}

impl AppState {
    pub fn new(
        config: Config,
        generator: Arc<dyn ImageGenerator>,
        enhancer: Arc<dyn PromptEnhancer>,
        storage: Arc<dyn Storage>,
        recorder: Arc<dyn GenerationRecorder>,
    ) -> Self {
        Self {
            models: ModelState {
                generator,
                enhancer,
                api_key: config.gemini_api_key().cloned(),
            },
            config,
            media: MediaState {
                storage,
                key_clock: Arc::new(KeyClock::new()),
            },
            db: DbState { recorder },
        }
    }
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for ModelState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.models.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for MediaState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.media.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for DbState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.db.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
