//! Test helpers: build AppState and router for integration tests.
//!
//! The model provider and database are replaced by in-memory fakes that count
//! their calls; storage is a real `LocalStorage` in a temp directory.

#![allow(dead_code)]

pub mod fakes;
pub mod storage;

use axum_test::TestServer;
use easel_api::constants;
use easel_api::setup::routes;
use easel_api::state::AppState;
use easel_core::Config;
use easel_storage::{LocalStorage, Storage};
use std::collections::HashMap;
use std::sync::Arc;

pub use fakes::{image_candidate, FakeEnhancer, FakeGenerator, FakeRecorder, PNG_BYTES};
pub use storage::{CdnStorage, OccupiedStorage, TestStorage};

pub const TEST_API_KEY: &str = "test-gemini-key";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on every fake it was built with.
pub struct TestApp {
    pub server: TestServer,
    pub generator: Arc<FakeGenerator>,
    pub enhancer: Arc<FakeEnhancer>,
    pub recorder: Arc<FakeRecorder>,
    pub storage: TestStorage,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub struct TestAppBuilder {
    api_key: bool,
    generator: FakeGenerator,
    enhancer: FakeEnhancer,
    recorder: FakeRecorder,
    storage_override: Option<Arc<dyn Storage>>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            api_key: true,
            generator: FakeGenerator::png(),
            enhancer: FakeEnhancer::returning("A steaming bowl of ramen, overhead shot"),
            recorder: FakeRecorder::new(),
            storage_override: None,
        }
    }
}

impl TestAppBuilder {
    pub fn without_api_key(mut self) -> Self {
        self.api_key = false;
        self
    }

    pub fn generator(mut self, generator: FakeGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn enhancer(mut self, enhancer: FakeEnhancer) -> Self {
        self.enhancer = enhancer;
        self
    }

    pub fn recorder(mut self, recorder: FakeRecorder) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage_override = Some(storage);
        self
    }

    pub async fn build(self) -> TestApp {
        let test_storage = TestStorage::new();
        let config = create_test_config(&test_storage, self.api_key);

        let storage: Arc<dyn Storage> = match self.storage_override {
            Some(storage) => storage,
            None => Arc::new(
                LocalStorage::new(test_storage.base_path.clone(), test_storage.base_url.clone())
                    .await
                    .expect("Failed to create local storage"),
            ),
        };

        let generator = Arc::new(self.generator);
        let enhancer = Arc::new(self.enhancer);
        let recorder = Arc::new(self.recorder);

        let state = Arc::new(AppState::new(
            config.clone(),
            generator.clone(),
            enhancer.clone(),
            storage,
            recorder.clone(),
        ));

        let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
        let server =
            TestServer::new(app.into_make_service()).expect("Failed to create test server");

        TestApp {
            server,
            generator,
            enhancer,
            recorder,
            storage: test_storage,
        }
    }
}

/// Default app: API key set, PNG-returning generator, working recorder.
pub async fn setup_test_app() -> TestApp {
    TestAppBuilder::default().build().await
}

fn create_test_config(storage: &TestStorage, with_api_key: bool) -> Config {
    let mut vars: HashMap<&str, String> = HashMap::from([
        ("DATABASE_URL", "postgres://localhost/easel_test".to_string()),
        ("ENVIRONMENT", "test".to_string()),
        ("STORAGE_BACKEND", "local".to_string()),
        ("LOCAL_STORAGE_PATH", storage.base_path_str()),
        ("LOCAL_STORAGE_BASE_URL", storage.base_url.clone()),
    ]);
    if with_api_key {
        vars.insert("GEMINI_API_KEY", TEST_API_KEY.to_string());
    }

    Config::from_lookup(|name| vars.get(name).cloned()).expect("Invalid test config")
}
