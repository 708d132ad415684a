//! Error types module
//!
//! Every failure a request can hit is unified under `AppError`. The HTTP layer
//! renders it through the `ErrorMetadata` trait, so the status code, machine
//! code, and client-facing text depend on the variant alone.
//!
//! The `Database` variant carries a `sqlx::Error` when the `sqlx` feature is on
//! (the default) and a plain string otherwise.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for upstream conditions outside our control
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPLOAD_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Classification of a failed call to the generative model provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// Rejected credential (401/403, or a 400 naming an invalid key).
    AuthFailure,
    /// Rate limit or quota exhaustion (429).
    QuotaExceeded,
    /// Anything else, including transport and decode failures.
    Other,
}

impl Display for UpstreamErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UpstreamErrorKind::AuthFailure => write!(f, "auth_failure"),
            UpstreamErrorKind::QuotaExceeded => write!(f, "quota_exceeded"),
            UpstreamErrorKind::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// `context` names the operation that failed ("Failed to generate image").
    #[error("{context}: {message}")]
    Upstream {
        kind: UpstreamErrorKind,
        context: &'static str,
        message: String,
    },

    #[error("No image data returned by the model")]
    NoImageData,

    #[error("Enhancement returned an empty result")]
    EmptyEnhancement,

    #[error("Upload failed: {0}")]
    Upload(String),

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, log_level).
/// client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (u16, &'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            LogLevel::Debug,
        ),
        AppError::Configuration(_) => (
            500,
            "CONFIGURATION_ERROR",
            false,
            Some("Contact the service operator"),
            LogLevel::Error,
        ),
        AppError::Upstream { kind, .. } => match kind {
            UpstreamErrorKind::AuthFailure => (
                401,
                "UPSTREAM_AUTH_FAILED",
                false,
                Some("Contact the service operator"),
                LogLevel::Error,
            ),
            UpstreamErrorKind::QuotaExceeded => (
                429,
                "UPSTREAM_QUOTA_EXCEEDED",
                true,
                Some("Wait a minute and retry"),
                LogLevel::Warn,
            ),
            UpstreamErrorKind::Other => (
                500,
                "UPSTREAM_ERROR",
                true,
                Some("Retry after a short delay"),
                LogLevel::Error,
            ),
        },
        AppError::NoImageData => (
            500,
            "NO_IMAGE_DATA",
            true,
            Some("Rephrase the prompt and try again"),
            LogLevel::Warn,
        ),
        AppError::EmptyEnhancement => (
            500,
            "EMPTY_ENHANCEMENT",
            true,
            Some("Retry after a short delay"),
            LogLevel::Warn,
        ),
        AppError::Upload(_) => (
            500,
            "UPLOAD_FAILED",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            false,
            Some("Contact support if this error persists"),
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Shorthand for an upstream failure while generating an image.
    pub fn generation_failed(kind: UpstreamErrorKind, message: impl Into<String>) -> Self {
        AppError::Upstream {
            kind,
            context: "Failed to generate image",
            message: message.into(),
        }
    }

    /// Shorthand for an upstream failure while enhancing a prompt.
    pub fn enhancement_failed(kind: UpstreamErrorKind, message: impl Into<String>) -> Self {
        AppError::Upstream {
            kind,
            context: "Failed to enhance prompt",
            message: message.into(),
        }
    }

    /// Get the error type name for log records
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Configuration(_) => "Configuration",
            AppError::Upstream { .. } => "Upstream",
            AppError::NoImageData => "NoImageData",
            AppError::EmptyEnhancement => "EmptyEnhancement",
            AppError::Upload(_) => "Upload",
            AppError::Database(_) => "Database",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::Configuration(ref msg) => msg.clone(),
            AppError::Upstream {
                kind: UpstreamErrorKind::AuthFailure,
                ..
            } => "Invalid API key. Please check your GEMINI_API_KEY environment variable."
                .to_string(),
            AppError::Upstream {
                kind: UpstreamErrorKind::QuotaExceeded,
                ..
            } => "API quota exceeded. Please try again later.".to_string(),
            AppError::Upstream {
                kind: UpstreamErrorKind::Other,
                context,
                message,
            } => format!("{}: {}", context, message),
            AppError::NoImageData => "No image data returned. Try another prompt.".to_string(),
            AppError::EmptyEnhancement => {
                "Enhancement returned empty result. Please try again.".to_string()
            }
            AppError::Upload(_) => "Upload failed".to_string(),
            AppError::Database(_) => "Failed to load generations. Please try again.".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
