//! Application route configuration.

use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, content_routes, generate_routes, moderation_routes, registration_routes,
    user_routes,
};
use super::middleware::{auth_middleware, rate_limit_auth_middleware, rate_limit_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::{API_NAME, API_VERSION};

/// Create the application router with all routes configured
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    // Registration and login (stricter rate limiting)
    let public = Router::new()
        .nest("/auth", auth_routes())
        .merge(registration_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_auth_middleware,
        ));

    // Everything else requires JWT + general rate limiting
    let protected = Router::new()
        .merge(user_routes())
        .merge(content_routes())
        .nest("/generate", generate_routes())
        .nest("/moderation", moderation_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public)
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
        .with_state(state)
}

/// Allow the configured origins with credentials.
///
/// Wildcards cannot be combined with credentials, so headers are mirrored.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

/// Root response
#[derive(Serialize)]
struct RootResponse {
    message: String,
    version: &'static str,
}

/// Root endpoint
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("Welcome to {}", API_NAME),
        version: API_VERSION,
    })
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn from_probe<E: std::fmt::Display>(probe: Option<Result<(), E>>) -> Self {
        match probe {
            Some(Ok(())) => ServiceStatus {
                status: "healthy",
                error: None,
            },
            Some(Err(e)) => ServiceStatus {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
            None => ServiceStatus {
                status: "unhealthy",
                error: Some("not configured".to_string()),
            },
        }
    }

    fn healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Health check endpoint with database and Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_probe = match &state.database {
        Some(database) => Some(database.ping().await),
        None => None,
    };
    let redis_probe = match &state.cache {
        Some(cache) => Some(cache.exists("health:ping").await.map(|_| ())),
        None => None,
    };

    let database = ServiceStatus::from_probe(db_probe);
    let redis = ServiceStatus::from_probe(redis_probe);
    let all_healthy = database.healthy() && redis.healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth { database, redis },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
