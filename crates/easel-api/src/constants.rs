//! API constants
//!
//! All JSON endpoints are versioned under [`API_PREFIX`]. Handler path
//! annotations for the OpenAPI document repeat the literal because utoipa
//! needs compile-time strings.

/// Versioned prefix for every JSON endpoint
pub const API_PREFIX: &str = "/api/v0";

/// Served location of the OpenAPI document
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Mount point for files written by the local storage backend
pub const MEDIA_PATH: &str = "/media";
