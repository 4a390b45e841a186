//! Validated body extractor for Axum
//!
//! `ValidatedPayload<T>` accepts `application/json` and
//! `application/x-www-form-urlencoded` bodies, then runs
//! `validator::Validate::validate()` on the result. Any other (or missing)
//! content type is read as an empty object so that required-field checks
//! still answer with a 400.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{FromRequest, Request};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ErrorBody;

/// An extractor that deserializes a JSON or form body and validates it.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateThing {
///     #[validate(required(message = "name is required"))]
///     name: Option<String>,
/// }
///
/// async fn handler(ValidatedPayload(body): ValidatedPayload<CreateThing>) { /* ... */ }
/// ```
pub struct ValidatedPayload<T>(pub T);

pub enum PayloadRejection {
    Json(JsonRejection),
    Form(FormRejection),
    Empty(serde_json::Error),
    Validation(validator::ValidationErrors),
}

impl PayloadRejection {
    fn message(&self) -> String {
        match self {
            Self::Json(rejection) => format!("Invalid request body: {}", rejection.body_text()),
            Self::Form(rejection) => format!("Invalid request body: {}", rejection.body_text()),
            Self::Empty(err) => format!("Invalid request body: {}", err),
            Self::Validation(errors) => {
                let mut messages: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("{}: {}", field, e.code))
                        })
                    })
                    .collect();
                messages.sort();
                messages.dedup();

                if messages.is_empty() {
                    "Validation failed".to_string()
                } else {
                    messages.join("; ")
                }
            }
        }
    }
}

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(ErrorBody::new(self.message()))).into_response()
    }
}

enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(req: &Request) -> BodyKind {
    let Some(content_type) = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return BodyKind::Other;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

impl<S, T> FromRequest<S> for ValidatedPayload<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = match body_kind(&req) {
            BodyKind::Json => {
                let Json(value) = Json::<T>::from_request(req, state)
                    .await
                    .map_err(PayloadRejection::Json)?;
                value
            }
            BodyKind::Form => {
                let Form(value) = Form::<T>::from_request(req, state)
                    .await
                    .map_err(PayloadRejection::Form)?;
                value
            }
            BodyKind::Other => serde_json::from_value(serde_json::json!({}))
                .map_err(PayloadRejection::Empty)?,
        };

        value.validate().map_err(PayloadRejection::Validation)?;

        Ok(ValidatedPayload(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct TestBody {
        #[validate(required(message = "name is required"), length(min = 1, message = "name is required"))]
        name: Option<String>,
    }

    async fn handler(ValidatedPayload(body): ValidatedPayload<TestBody>) -> String {
        body.name.unwrap_or_default()
    }

    fn app() -> Router {
        Router::new().route("/test", post(handler))
    }

    async fn send(req: Request<Body>) -> (StatusCode, String) {
        use tower::Service;
        let mut svc = app().into_service();
        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn post_with(content_type: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/test");
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn json_body_is_accepted() {
        let (status, body) = send(post_with(
            Some("application/json; charset=utf-8"),
            r#"{"name":"Alice"}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Alice");
    }

    #[tokio::test]
    async fn form_body_is_accepted() {
        let (status, body) =
            send(post_with(Some("application/x-www-form-urlencoded"), "name=Bob")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Bob");
    }

    #[tokio::test]
    async fn missing_content_type_reads_as_empty_and_fails_validation() {
        let (status, body) = send(post_with(None, "name=Bob")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("name is required"));
    }

    #[tokio::test]
    async fn empty_string_fails_validation_once() {
        let (status, body) = send(post_with(Some("application/json"), r#"{"name":""}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "name is required");
    }

    #[tokio::test]
    async fn malformed_json_returns_400() {
        let (status, body) = send(post_with(Some("application/json"), "not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid request body"));
    }
}
