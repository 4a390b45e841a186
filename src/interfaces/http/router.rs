//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    http::{HeaderName, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{fault_middleware, not_found, panic_response, ErrorBody};
use super::modules::health::{self, HealthResponse, HealthState};
use super::modules::metrics::{self, http_metrics_middleware, MetricsSource, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::users::{self, CreateUserRequest, UserDto, UserHandlerState, UserListResponse};
use crate::application::UserService;
use crate::config::Environment;
use crate::domain::UserRepository;

/// Unified router state. Each handler extracts its own slice via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub user_service: Arc<UserService>,
    pub environment: Environment,
    pub started_at: Instant,
    pub metrics: MetricsSource,
}

impl ApiState {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        environment: Environment,
        metrics: MetricsSource,
    ) -> Self {
        Self {
            user_service: Arc::new(UserService::new(repo)),
            environment,
            started_at: Instant::now(),
            metrics,
        }
    }
}

impl FromRef<ApiState> for HealthState {
    fn from_ref(s: &ApiState) -> Self {
        HealthState {
            started_at: s.started_at,
            environment: s.environment.clone(),
        }
    }
}

impl FromRef<ApiState> for UserHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        UserHandlerState {
            user_service: Arc::clone(&s.user_service),
        }
    }
}

impl FromRef<ApiState> for MetricsState {
    fn from_ref(s: &ApiState) -> Self {
        MetricsState {
            source: s.metrics.clone(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::list_users,
        users::get_user,
        users::create_user,
        metrics::prometheus_metrics,
    ),
    components(
        schemas(
            HealthResponse,
            UserDto,
            UserListResponse,
            CreateUserRequest,
            ErrorBody,
        )
    ),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Users", description = "Sample user directory"),
        (name = "Metrics", description = "Prometheus scrape endpoint"),
    ),
    info(
        title = "Dashboard API",
        version = "0.1.0",
        description = "REST API backing the thesis dashboard"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: ApiState) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route(
            "/api/v1/users",
            get(users::list_users).post(users::create_user),
        )
        .route("/api/v1/users/{id}", get(users::get_user))
        .with_state(state.clone());

    let router = routes
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found);

    apply_layers(router, &state)
}

/// Middleware stack, innermost first.
pub(crate) fn apply_layers(router: Router, state: &ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            state.environment.clone(),
            fault_middleware,
        ))
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .layer(security_header("x-content-type-options", "nosniff"))
        .layer(security_header("x-frame-options", "SAMEORIGIN"))
        .layer(security_header("referrer-policy", "no-referrer"))
        .layer(security_header("x-dns-prefetch-control", "off"))
        .layer(security_header("cross-origin-opener-policy", "same-origin"))
        .layer(security_header("cross-origin-resource-policy", "same-origin"))
        .layer(security_header(
            "strict-transport-security",
            "max-age=15552000; includeSubDomains",
        ))
        .layer(cors)
}

fn security_header(name: &'static str, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}
