//! Data models for the application

mod generation;

pub use generation::*;
