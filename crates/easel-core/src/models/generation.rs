use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::AppError;

/// Key segment used when a request carries no user identifier.
pub const ANONYMOUS_SEGMENT: &str = "anon";

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 200;

const MAX_USER_ID_LEN: usize = 128;

/// A persisted generation, as stored in the `generations` table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct GenerationRecord {
    pub id: Uuid,
    pub user_id: String,
    pub original_prompt: String,
    pub enhanced_prompt: Option<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Row to insert after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGeneration {
    pub user_id: String,
    pub original_prompt: String,
    pub enhanced_prompt: Option<String>,
    pub image_url: String,
}

/// Body of `POST /generate`.
///
/// `prompt` accepts any JSON value so that a non-string prompt is reported as
/// a missing prompt instead of a body rejection.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(value_type = String, example = "A rustic sourdough loaf on a marble counter")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub save: bool,
    /// Rewritten prompt to send to the model instead of `prompt`.
    #[serde(default)]
    pub enhanced_prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub image_url: String,
}

/// Body of `POST /enhance`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EnhanceRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(value_type = String, example = "pasta")]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EnhanceResponse {
    pub enhanced: String,
}

/// Query parameters of `GET /generations`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListGenerationsQuery {
    /// Owner of the generations to list
    pub user_id: Option<String>,
    /// Page size (default 50, max 200)
    pub limit: Option<i64>,
    /// Number of newer rows to skip (default 0)
    pub offset: Option<i64>,
}

impl ListGenerationsQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerationListResponse {
    pub generations: Vec<GenerationRecord>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// Trim the prompt and reject it when nothing is left.
pub fn normalize_prompt(prompt: Option<&str>) -> Result<String, AppError> {
    let trimmed = prompt.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("Prompt is required".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Check that a user identifier can be used as a single key segment.
///
/// Absent and empty identifiers yield `None` (anonymous).
pub fn validate_user_segment(user_id: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(user_id) = user_id.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let unsafe_segment = user_id.len() > MAX_USER_ID_LEN
        || user_id == "."
        || user_id.contains("..")
        || user_id.contains('/')
        || user_id.contains('\\')
        || user_id.chars().any(char::is_control);

    if unsafe_segment {
        return Err(AppError::InvalidInput(
            "userId must be a single path segment without '/', '\\' or '..'".to_string(),
        ));
    }

    Ok(Some(user_id.to_string()))
}
