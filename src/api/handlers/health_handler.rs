//! Liveness and dependency health.

use axum::{extract::State, http::StatusCode, response::Json};
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: &'static str,
    pub services: BTreeMap<&'static str, ServiceStatus>,
}

/// Individual service health status
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Root endpoint
pub async fn root() -> &'static str {
    "SkillBridge API"
}

/// Check every dependency concurrently
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies reachable"),
        (status = 503, description = "At least one dependency is down")
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let results = join_all(state.health_checks.iter().map(|dependency| async move {
        let status = match dependency.check().await {
            Ok(()) => ServiceStatus {
                status: "healthy",
                error: None,
            },
            Err(e) => {
                tracing::warn!(service = dependency.name(), error = %e, "Health check failed");
                ServiceStatus {
                    status: "unhealthy",
                    error: Some(e.to_string()),
                }
            }
        };
        (dependency.name(), status)
    }))
    .await;

    let all_healthy = results.iter().all(|(_, s)| s.status == "healthy");
    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: results.into_iter().collect(),
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
