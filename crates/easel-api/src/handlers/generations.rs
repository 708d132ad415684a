//! Gallery listing endpoint

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DbState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    Json,
};
use easel_core::models::{GenerationListResponse, GenerationRecord, ListGenerationsQuery};
use easel_core::AppError;

#[utoipa::path(
    get,
    path = "/api/v0/generations",
    tag = "generation",
    params(ListGenerationsQuery),
    responses(
        (status = 200, description = "Generations, newest first", body = GenerationListResponse),
        (status = 400, description = "Missing userId or invalid query", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "list_generations"))]
pub async fn list_generations(
    State(db): State<DbState>,
    query: Result<Query<ListGenerationsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(query) = query.map_err(|rejection| {
        AppError::InvalidInput(format!("Invalid query: {}", rejection.body_text()))
    })?;

    let user_id = query
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidInput("userId is required".to_string()))?;
    let limit = query.effective_limit();
    let offset = query.effective_offset();

    let generations: Vec<GenerationRecord> =
        db.recorder.list_for_user(user_id, limit, offset).await?;

    tracing::debug!(user_id = %user_id, limit, offset, count = generations.len(), "Listed generations");

    Ok(Json(GenerationListResponse { generations }))
}
