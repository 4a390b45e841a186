//! Health check handler

use std::time::Instant;

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::Environment;

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub started_at: Instant,
    pub environment: Environment,
}

/// Service health response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `healthy`
    pub status: String,
    /// Current time, RFC 3339 UTC
    pub timestamp: String,
    /// Seconds since the service started
    pub uptime: f64,
    /// Deployment-mode label
    pub environment: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.environment.label().to_string(),
    })
}
