//! Route configuration and setup

use crate::constants::{API_PREFIX, MEDIA_PATH, OPENAPI_PATH};
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use easel_core::{Config, StorageBackend};
use easel_infra::{request_id_middleware, security_headers_middleware};
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Server-level concurrency limit to protect against resource exhaustion under extreme load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        request_timeout_secs = config.request_timeout_secs(),
        "HTTP concurrency limit and request timeout enabled"
    );

    let mut app = health_routes()
        .merge(generation_routes())
        .route(
            OPENAPI_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_PATH).path("/docs"));

    if let Some(media_dir) = local_media_dir(config) {
        tracing::info!(path = %media_dir, mount = MEDIA_PATH, "Serving local media files");
        app = app.nest_service(MEDIA_PATH, ServeDir::new(media_dir));
    }

    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs(),
        )))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(config.max_request_body_bytes()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Directory to expose under `/media` when files are stored locally.
fn local_media_dir(config: &Config) -> Option<String> {
    match config.storage_backend() {
        StorageBackend::Local => config.local_storage_path().map(String::from),
        StorageBackend::S3 => None,
    }
}

/// Liveness and readiness probes
fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health/live", get(handlers::health::liveness_check))
        .route("/health/ready", get(handlers::health::readiness_check))
}

/// Generation, enhancement, and gallery endpoints
fn generation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/generate", API_PREFIX),
            post(handlers::generate::generate_image),
        )
        .route(
            &format!("{}/enhance", API_PREFIX),
            post(handlers::enhance::enhance_prompt),
        )
        .route(
            &format!("{}/generations", API_PREFIX),
            get(handlers::generations::list_generations),
        )
}
