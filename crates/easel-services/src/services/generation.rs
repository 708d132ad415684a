//! Generative model provider abstraction.

use async_trait::async_trait;
use easel_core::{ApiKey, UpstreamErrorKind};
use thiserror::Error;

/// Failed call to the model provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct GenerationError {
    pub kind: UpstreamErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: UpstreamErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Other, message)
    }
}

/// Decoded binary payload returned by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    InlineImage(InlineImage),
}

/// One candidate output; parts keep the order the provider returned them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub parts: Vec<Part>,
}

/// Text-to-image generation.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Submit `prompt` once (no retry) and return every candidate, possibly none.
    async fn generate(&self, api_key: &ApiKey, prompt: &str)
        -> Result<Vec<Candidate>, GenerationError>;
}

/// Prompt rewriting with a text model.
#[async_trait]
pub trait PromptEnhancer: Send + Sync {
    /// Returns the trimmed rewritten prompt, which may be empty.
    async fn enhance(&self, api_key: &ApiKey, prompt: &str) -> Result<String, GenerationError>;
}
