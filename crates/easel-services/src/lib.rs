//! Easel Services Layer
//!
//! Clients for the generative model provider and the pure helpers that turn
//! its responses into something the API can store. The API depends on the
//! `ImageGenerator` and `PromptEnhancer` traits, never on the HTTP client.

pub mod services;

pub use services::extract::first_inline_image;
pub use services::gemini::{GeminiClient, GeminiClientConfig};
pub use services::generation::{
    Candidate, GenerationError, ImageGenerator, InlineImage, Part, PromptEnhancer,
};
pub use services::prompt::enhancement_instruction;
