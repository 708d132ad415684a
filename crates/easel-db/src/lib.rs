//! Easel database layer
//!
//! Repositories over the Postgres pool, plus the traits the API depends on so
//! that handlers can be exercised without a database.

pub mod db;

pub use db::{GenerationRecorder, GenerationRepository};
