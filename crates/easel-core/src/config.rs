//! Configuration module
//!
//! This module provides configuration structures for the API: server, database,
//! storage, and generative model provider settings.

use std::env;

use crate::credentials::{resolve_api_key, ApiKey};
use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 180;
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const GEMINI_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";
const GEMINI_TEXT_MODEL: &str = "gemini-2.0-flash";

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub request_timeout_secs: u64,
    pub max_request_body_bytes: usize,
    pub environment: String,
    /// `LOG_FORMAT=json` switches the log output to JSON lines
    pub log_json: bool,
}

/// Generation service configuration
#[derive(Clone, Debug)]
pub struct GenerationServiceConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, Supabase, Spaces)
    pub aws_region: Option<String>,
    pub public_base_url: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Generative model provider
    pub gemini_api_key: Option<ApiKey>,
    pub gemini_api_base: String,
    pub gemini_image_model: String,
    pub gemini_text_model: String,
    /// Client-side timeout for Gemini calls; `None` leaves the transport default.
    pub gemini_timeout_secs: Option<u64>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<GenerationServiceConfig>);

impl Config {
    fn inner(&self) -> &GenerationServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = GenerationServiceConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn log_json(&self) -> bool {
        self.inner().base.log_json
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.inner().base.request_timeout_secs
    }

    pub fn max_request_body_bytes(&self) -> usize {
        self.inner().base.max_request_body_bytes
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend.unwrap_or(StorageBackend::S3)
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    /// `S3_REGION`, falling back to `AWS_REGION`
    pub fn s3_region(&self) -> Option<&str> {
        self.inner()
            .s3_region
            .as_deref()
            .or(self.inner().aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.inner().public_base_url.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn gemini_api_key(&self) -> Option<&ApiKey> {
        self.inner().gemini_api_key.as_ref()
    }

    pub fn gemini_api_base(&self) -> &str {
        &self.inner().gemini_api_base
    }

    pub fn gemini_image_model(&self) -> &str {
        &self.inner().gemini_image_model
    }

    pub fn gemini_text_model(&self) -> &str {
        &self.inner().gemini_text_model
    }

    pub fn gemini_timeout_secs(&self) -> Option<u64> {
        self.inner().gemini_timeout_secs
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

impl GenerationServiceConfig {
    /// Build the configuration from a variable lookup.
    ///
    /// `from_env` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: parse_or(lookup("DB_MAX_CONNECTIONS"), MAX_CONNECTIONS),
            db_timeout_seconds: parse_or(lookup("DB_TIMEOUT_SECONDS"), CONNECTION_TIMEOUT_SECS),
            request_timeout_secs: parse_or(lookup("REQUEST_TIMEOUT_SECS"), REQUEST_TIMEOUT_SECS),
            max_request_body_bytes: parse_or(
                lookup("MAX_REQUEST_BODY_BYTES"),
                MAX_REQUEST_BODY_BYTES,
            ),
            environment,
            log_json: lookup("LOG_FORMAT")
                .map(|f| f.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(s) => Some(s.parse::<StorageBackend>()?),
            None => None,
        };

        let non_empty = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

        Ok(GenerationServiceConfig {
            base,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            storage_backend,
            s3_bucket: non_empty("S3_BUCKET"),
            s3_region: non_empty("S3_REGION"),
            s3_endpoint: non_empty("S3_ENDPOINT"),
            aws_region: non_empty("AWS_REGION"),
            public_base_url: non_empty("PUBLIC_BASE_URL"),
            local_storage_path: non_empty("LOCAL_STORAGE_PATH"),
            local_storage_base_url: non_empty("LOCAL_STORAGE_BASE_URL"),
            gemini_api_key: resolve_api_key(&lookup),
            gemini_api_base: non_empty("GEMINI_API_BASE")
                .unwrap_or_else(|| GEMINI_API_BASE.to_string()),
            gemini_image_model: non_empty("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| GEMINI_IMAGE_MODEL.to_string()),
            gemini_text_model: non_empty("GEMINI_TEXT_MODEL")
                .unwrap_or_else(|| GEMINI_TEXT_MODEL.to_string()),
            gemini_timeout_secs: non_empty("GEMINI_TIMEOUT_SECS")
                .map(|s| {
                    s.trim().parse::<u64>().map_err(|_| {
                        anyhow::anyhow!("GEMINI_TIMEOUT_SECS must be a number of seconds")
                    })
                })
                .transpose()?,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.base.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be greater than 0"));
        }

        // Validate storage backend configuration
        let backend = self.storage_backend.unwrap_or(StorageBackend::S3);
        match backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
