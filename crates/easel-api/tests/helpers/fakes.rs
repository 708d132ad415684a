//! In-memory stand-ins for the model provider and the database.

use async_trait::async_trait;
use chrono::Utc;
use easel_core::models::{GenerationRecord, NewGeneration};
use easel_core::{ApiKey, AppError, UpstreamErrorKind};
use easel_db::GenerationRecorder;
use easel_services::{
    Candidate, GenerationError, ImageGenerator, InlineImage, Part, PromptEnhancer,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Smallest valid PNG signature plus a byte, enough to check round trips.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x01];

pub fn image_candidate(mime_type: &str, data: &[u8]) -> Candidate {
    Candidate {
        parts: vec![
            Part::Text("Here is your image".to_string()),
            Part::InlineImage(InlineImage {
                mime_type: mime_type.to_string(),
                data: data.to_vec(),
            }),
        ],
    }
}

pub struct FakeGenerator {
    outcome: Result<Vec<Candidate>, GenerationError>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn returning(candidates: Vec<Candidate>) -> Self {
        Self {
            outcome: Ok(candidates),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// One candidate carrying a PNG after a text part.
    pub fn png() -> Self {
        Self::returning(vec![image_candidate("image/png", PNG_BYTES)])
    }

    pub fn failing(kind: UpstreamErrorKind, message: &str) -> Self {
        Self {
            outcome: Err(GenerationError::new(kind, message)),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate(
        &self,
        _api_key: &ApiKey,
        prompt: &str,
    ) -> Result<Vec<Candidate>, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.outcome.clone()
    }
}

pub struct FakeEnhancer {
    outcome: Result<String, GenerationError>,
    calls: AtomicUsize,
}

impl FakeEnhancer {
    pub fn returning(enhanced: &str) -> Self {
        Self {
            outcome: Ok(enhanced.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(kind: UpstreamErrorKind, message: &str) -> Self {
        Self {
            outcome: Err(GenerationError::new(kind, message)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PromptEnhancer for FakeEnhancer {
    async fn enhance(&self, _api_key: &ApiKey, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Recorder keeping rows in insertion order; `broken()` fails every call.
#[derive(Default)]
pub struct FakeRecorder {
    rows: Mutex<Vec<GenerationRecord>>,
    record_calls: AtomicUsize,
    broken: bool,
}

impl FakeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn record_calls(&self) -> usize {
        self.record_calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<GenerationRecord> {
        self.rows.lock().unwrap().clone()
    }

    fn failure() -> AppError {
        AppError::Database(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl GenerationRecorder for FakeRecorder {
    async fn record(&self, generation: NewGeneration) -> Result<GenerationRecord, AppError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return Err(Self::failure());
        }

        let record = GenerationRecord {
            id: Uuid::new_v4(),
            user_id: generation.user_id,
            original_prompt: generation.original_prompt,
            enhanced_prompt: generation.enhanced_prompt,
            image_url: generation.image_url,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GenerationRecord>, AppError> {
        if self.broken {
            return Err(Self::failure());
        }

        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.broken {
            return Err(Self::failure());
        }
        Ok(())
    }
}
