//! Prometheus metrics handler
//!
//! Exposes `GET /metrics` in Prometheus text format, either the fixed
//! sample block or whatever the installed recorder has collected.

use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Fixed exposition served in static mode.
pub const STATIC_EXPOSITION: &str = "\
# HELP http_requests_total Total number of HTTP requests
# TYPE http_requests_total counter
http_requests_total{method=\"GET\",endpoint=\"/api/v1/users\"} 150
http_requests_total{method=\"POST\",endpoint=\"/api/v1/users\"} 23

# HELP http_request_duration_seconds HTTP request latency in seconds
# TYPE http_request_duration_seconds histogram
http_request_duration_seconds_bucket{le=\"0.1\"} 95
http_request_duration_seconds_bucket{le=\"0.5\"} 145
http_request_duration_seconds_bucket{le=\"1.0\"} 150
http_request_duration_seconds_sum 35.5
http_request_duration_seconds_count 150";

#[derive(Clone)]
pub enum MetricsSource {
    Static,
    Prometheus(PrometheusHandle),
}

/// Shared state for the metrics endpoint
#[derive(Clone)]
pub struct MetricsState {
    pub source: MetricsSource,
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Metrics",
    responses(
        (status = 200, description = "Prometheus text exposition", body = String, content_type = "text/plain")
    )
)]
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    let body = match &state.source {
        MetricsSource::Static => STATIC_EXPOSITION.to_string(),
        MetricsSource::Prometheus(handle) => handle.render(),
    };
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        body,
    )
}
