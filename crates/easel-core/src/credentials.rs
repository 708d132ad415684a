//! Generation API credential resolution.
//!
//! The key is read from one of two accepted variable names; the first one that
//! is present and non-empty wins.

use std::fmt::{Debug, Formatter, Result as FmtResult};

/// Accepted variable names, in priority order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_GEMINI_API_KEY"];

/// API key for the generative model provider.
///
/// `Debug` is redacted so the key never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("ApiKey(***)")
    }
}

/// Resolve the API key through `lookup`, trying each accepted name in order.
pub fn resolve_api_key<F>(lookup: F) -> Option<ApiKey>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_ENV_VARS.iter().find_map(|name| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(ApiKey)
    })
}

/// Resolve the API key from the process environment.
pub fn resolve_api_key_from_env() -> Option<ApiKey> {
    resolve_api_key(|name| std::env::var(name).ok())
}
