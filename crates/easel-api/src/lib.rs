//! Easel API Library
//!
//! This crate provides the HTTP handlers, error rendering, and application setup
//! for the image generation service.

mod api_doc;
pub mod constants;
mod handlers;

pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
