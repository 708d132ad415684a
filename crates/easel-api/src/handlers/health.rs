//! Health check handlers and response types.

use crate::state::{DbState, MediaState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use utoipa::ToSchema;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns "ready", "timeout", or "not_ready: {error}".
async fn run_check<F, E>(timeout: Duration, f: F) -> (bool, String)
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => (true, "ready".to_string()),
        Ok(Err(e)) => (false, format!("not_ready: {}", e)),
        Err(_) => (false, "timeout".to_string()),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LivenessResponse {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub database: String,
    pub storage: String,
}

/// Liveness probe - process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses((status = 200, description = "Process is running", body = LivenessResponse))
)]
pub async fn liveness_check() -> impl IntoResponse {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe - database and storage.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Dependencies reachable", body = ReadinessResponse),
        (status = 503, description = "A dependency is unreachable", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(
    State(db): State<DbState>,
    State(media): State<MediaState>,
) -> impl IntoResponse {
    let (database_ok, database) = run_check(CHECK_TIMEOUT, db.recorder.ping()).await;
    if !database_ok {
        tracing::error!(database = %database, "Database readiness check failed");
    }

    let (storage_ok, storage) = run_check(CHECK_TIMEOUT, media.storage.health_check()).await;
    if !storage_ok {
        tracing::error!(storage = %storage, "Storage readiness check failed");
    }

    let ready = database_ok && storage_ok;
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            database,
            storage,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_check_outcomes() {
        let (ok, status) = run_check(CHECK_TIMEOUT, async { Ok::<(), String>(()) }).await;
        assert!(ok);
        assert_eq!(status, "ready");

        let (ok, status) =
            run_check(CHECK_TIMEOUT, async { Err::<(), _>("connection refused") }).await;
        assert!(!ok);
        assert_eq!(status, "not_ready: connection refused");

        let (ok, status) = run_check(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok::<(), String>(())
        })
        .await;
        assert!(!ok);
        assert_eq!(status, "timeout");
    }
}
