//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use easel_core::Config;

/// Validate critical configuration values
///
/// A missing model API key is deliberately not checked here: it is reported on
/// each request that needs it.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    // Validate CORS configuration in production
    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production - this is a security risk. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    // Validate database connection settings
    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    if config.max_request_body_bytes() == 0 {
        return Err(anyhow::anyhow!("Max request body size cannot be 0"));
    }

    if config.gemini_timeout_secs() == Some(0) {
        return Err(anyhow::anyhow!("GEMINI_TIMEOUT_SECS must be greater than 0"));
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned()).unwrap()
    }

    const BASE: [(&str, &str); 4] = [
        ("DATABASE_URL", "postgres://localhost/easel"),
        ("STORAGE_BACKEND", "local"),
        ("LOCAL_STORAGE_PATH", "/tmp/easel"),
        ("LOCAL_STORAGE_BASE_URL", "http://localhost:4000/media"),
    ];

    #[test]
    fn test_valid_config_without_api_key() {
        assert!(validate_config(&config(&BASE)).is_ok());
    }

    #[test]
    fn test_rejects_zero_connections() {
        let mut vars = BASE.to_vec();
        vars.push(("DB_MAX_CONNECTIONS", "0"));
        assert!(validate_config(&config(&vars)).is_err());
    }

    #[test]
    fn test_rejects_zero_gemini_timeout() {
        let mut vars = BASE.to_vec();
        vars.push(("GEMINI_TIMEOUT_SECS", "0"));
        assert!(validate_config(&config(&vars)).is_err());
    }
}
