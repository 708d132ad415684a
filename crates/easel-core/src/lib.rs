//! Easel Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration, and
//! credential resolution shared by every Easel crate.

pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, GenerationServiceConfig};
pub use credentials::{resolve_api_key, resolve_api_key_from_env, ApiKey, API_KEY_ENV_VARS};
pub use error::{AppError, ErrorMetadata, LogLevel, UpstreamErrorKind};
pub use storage_types::StorageBackend;
