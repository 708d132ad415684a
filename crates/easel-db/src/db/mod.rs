//! Database repositories for data access layer
//!
//! Each repository is responsible for one table and exposes the queries the
//! API needs over it.

pub mod generation;

pub use generation::{GenerationRecorder, GenerationRepository};
