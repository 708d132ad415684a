//! Image generation endpoint

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use easel_core::models::{
    normalize_prompt, validate_user_segment, GenerateRequest, GenerateResponse, NewGeneration,
};
use easel_core::AppError;
use easel_services::first_inline_image;
use easel_storage::{generation_key, IMAGE_CONTENT_TYPE};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/v0/generate",
    tag = "generation",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Image generated and stored", body = GenerateResponse),
        (status = 400, description = "Missing prompt or invalid body", body = ErrorResponse),
        (status = 401, description = "Model provider rejected the API key", body = ErrorResponse),
        (status = 429, description = "Model provider quota exceeded", body = ErrorResponse),
        (status = 500, description = "Configuration, generation, or upload failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "generate_image"))]
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<GenerateRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let prompt = normalize_prompt(request.prompt.as_deref())?;
    let user_segment = validate_user_segment(request.user_id.as_deref())?;

    let api_key = state.models.api_key.as_ref().ok_or_else(|| {
        AppError::Configuration("Missing GEMINI_API_KEY environment variable".to_string())
    })?;

    // A caller-supplied rewrite replaces the prompt sent to the model.
    let model_prompt = request
        .enhanced_prompt
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(|| prompt.clone());

    tracing::info!(
        user_id = user_segment.as_deref().unwrap_or("anon"),
        save = request.save,
        enhanced = model_prompt != prompt,
        "Generating image"
    );

    let candidates = state
        .models
        .generator
        .generate(api_key, &model_prompt)
        .await
        .map_err(|e| AppError::generation_failed(e.kind, e.message))?;

    let image = first_inline_image(candidates).ok_or(AppError::NoImageData)?;

    let storage_key = generation_key(
        user_segment.as_deref(),
        state.media.key_clock.next_millis(),
    );
    tracing::debug!(mime_type = %image.mime_type, size_bytes = image.data.len(), "Extracted image");

    state
        .media
        .storage
        .upload_with_key(&storage_key, image.data, IMAGE_CONTENT_TYPE)
        .await?;
    let image_url = state.media.storage.public_url(&storage_key);

    tracing::info!(storage_key = %storage_key, image_url = %image_url, "Image stored");

    if request.save && !image_url.is_empty() {
        if let Some(user_id) = user_segment {
            let generation = NewGeneration {
                user_id,
                original_prompt: prompt,
                enhanced_prompt: Some(model_prompt),
                image_url: image_url.clone(),
            };
            // The image is already stored; a failed insert must not fail the request.
            if let Err(e) = state.db.recorder.record(generation).await {
                tracing::warn!(error = %e, storage_key = %storage_key, "Failed to save generation");
            }
        }
    }

    Ok(Json(GenerateResponse { image_url }))
}
