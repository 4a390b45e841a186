//! Top-level fault handling
//!
//! Handler errors ([`ApiError::Internal`](super::ApiError)) and panics caught
//! by `CatchPanicLayer` both produce a 500 tagged with a [`FaultDetail`]
//! extension. [`fault_middleware`] logs the detail and rewrites the body,
//! adding `message` only when the deployment mode allows it.

use std::any::Any;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::error::{ApiError, ErrorBody};
use crate::config::Environment;
use crate::interfaces::http::modules::request_id::RequestId;

/// Underlying cause of a 500, carried in response extensions.
#[derive(Clone, Debug)]
pub struct FaultDetail(pub String);

pub async fn fault_middleware(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    let mut response = next.run(request).await;
    let Some(FaultDetail(detail)) = response.extensions_mut().remove::<FaultDetail>() else {
        return response;
    };

    error!(%request_id, %method, %uri, detail = %detail, "Unhandled fault while processing request");

    let message = environment.exposes_fault_detail().then_some(detail);
    let mut rewritten =
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::internal(message))).into_response();
    for (name, value) in response.headers() {
        if name != axum::http::header::CONTENT_TYPE && name != axum::http::header::CONTENT_LENGTH {
            rewritten.headers_mut().append(name.clone(), value.clone());
        }
    }
    rewritten
}

/// Response builder for `CatchPanicLayer::custom`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payload_text_becomes_detail() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.extensions().get::<FaultDetail>().unwrap().0, "boom");

        let response = panic_response(Box::new(String::from("owned boom")));
        assert_eq!(
            response.extensions().get::<FaultDetail>().unwrap().0,
            "owned boom"
        );
    }

    #[test]
    fn opaque_panic_payload_gets_generic_detail() {
        let response = panic_response(Box::new(42_u8));
        assert_eq!(
            response.extensions().get::<FaultDetail>().unwrap().0,
            "handler panicked"
        );
    }
}
