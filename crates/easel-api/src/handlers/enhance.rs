//! Prompt enhancement endpoint

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::ModelState;
use axum::{extract::State, response::IntoResponse, Json};
use easel_core::models::{normalize_prompt, EnhanceRequest, EnhanceResponse};
use easel_core::AppError;

#[utoipa::path(
    post,
    path = "/api/v0/enhance",
    tag = "generation",
    request_body = EnhanceRequest,
    responses(
        (status = 200, description = "Rewritten prompt", body = EnhanceResponse),
        (status = 400, description = "Missing prompt or invalid body", body = ErrorResponse),
        (status = 401, description = "Model provider rejected the API key", body = ErrorResponse),
        (status = 429, description = "Model provider quota exceeded", body = ErrorResponse),
        (status = 500, description = "Configuration or enhancement failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "enhance_prompt"))]
pub async fn enhance_prompt(
    State(models): State<ModelState>,
    ValidatedJson(request): ValidatedJson<EnhanceRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let prompt = normalize_prompt(request.prompt.as_deref())?;

    let api_key = models.api_key.as_ref().ok_or_else(|| {
        AppError::Configuration("Server configuration error: API key not found".to_string())
    })?;

    let enhanced = models
        .enhancer
        .enhance(api_key, &prompt)
        .await
        .map_err(|e| AppError::enhancement_failed(e.kind, e.message))?;

    if enhanced.is_empty() {
        return Err(AppError::EmptyEnhancement.into());
    }

    tracing::debug!(
        original_len = prompt.len(),
        enhanced_len = enhanced.len(),
        "Prompt enhanced"
    );

    Ok(Json(EnhanceResponse { enhanced }))
}
