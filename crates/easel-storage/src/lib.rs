//! Easel Storage Library
//!
//! This crate provides the storage abstraction for generated images and its
//! S3-compatible and local filesystem implementations.
//!
//! # Storage key format
//!
//! Every backend stores generations under the same layout:
//!
//! `generations/{userId|anon}/{epochMillis}.{ext}`
//!
//! Keys must not contain `..` or a leading `/`. Key construction is centralized
//! in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use easel_core::StorageBackend;
pub use factory::create_storage;
pub use keys::{
    generation_key, KeyClock, GENERATIONS_PREFIX, IMAGE_CONTENT_TYPE, IMAGE_EXTENSION,
};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
