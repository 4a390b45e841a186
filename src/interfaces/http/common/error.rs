//! API error type and the `{error, message?}` response body

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::fault::FaultDetail;
use crate::domain::DomainError;

/// Error body returned by every failing route.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    /// Fault detail, present on 500 responses outside production only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn internal(message: Option<String>) -> Self {
        Self {
            error: "Internal server error".to_string(),
            message,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Unexpected fault. The detail never reaches the body directly; see
    /// [`fault_middleware`](super::fault_middleware).
    #[error("{0}")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::BadRequest(msg),
            DomainError::NotFound { entity, .. } => Self::NotFound(format!("{} not found", entity)),
            DomainError::Storage(msg) => Self::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, Json(ErrorBody::new(msg))).into_response(),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, Json(ErrorBody::new(msg))).into_response(),
            Self::Internal(detail) => {
                let mut response =
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::internal(None))).into_response();
                response.extensions_mut().insert(FaultDetail(detail));
                response
            }
        }
    }
}

/// Fallback for unmatched routes and methods.
pub async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found")))
}
