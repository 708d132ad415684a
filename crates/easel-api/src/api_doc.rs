//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use easel_core::models;

/// OpenAPI document served at `crate::constants::OPENAPI_PATH`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Easel API",
        version = "0.1.0",
        description = "Text-to-image generation for restaurant and food imagery. Prompts are sent to Gemini, the first returned image is stored in object storage, and generations can be listed per user. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::generate::generate_image,
        handlers::enhance::enhance_prompt,
        handlers::generations::list_generations,
        handlers::health::liveness_check,
        handlers::health::readiness_check,
    ),
    components(
        schemas(
            models::GenerateRequest,
            models::GenerateResponse,
            models::EnhanceRequest,
            models::EnhanceResponse,
            models::GenerationRecord,
            models::GenerationListResponse,
            handlers::health::LivenessResponse,
            handlers::health::ReadinessResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "generation", description = "Image generation, prompt enhancement, and gallery"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
