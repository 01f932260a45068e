//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Form, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::{AppError, AppResult};
use crate::services::TokenResponse;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Unique login name
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    #[schema(example = "layla")]
    pub username: String,
    /// User password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Optional display name
    #[validate(length(max = 255, message = "Full name must be at most 255 characters"))]
    #[schema(example = "Layla Haddad")]
    pub full_name: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "layla")]
    pub username: String,
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// OAuth2 password-flow form body
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
    /// Ignored, accepted for OAuth2 clients
    pub grant_type: Option<String>,
    /// Ignored, accepted for OAuth2 clients
    pub scope: Option<String>,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/token", post(token))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error or username already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .services
        .auth()
        .register(payload.username, payload.password, payload.full_name)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Inactive user")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .services
        .auth()
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(token))
}

/// OAuth2 password flow token endpoint
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "Authentication",
    request_body(content = TokenForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Inactive user")
    )
)]
pub async fn token(
    State(state): State<AppState>,
    form: Result<Form<TokenForm>, axum::extract::rejection::FormRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Form(form) = form.map_err(|e| AppError::validation(e.body_text()))?;
    let token = state
        .services
        .auth()
        .login(&form.username, &form.password)
        .await?;

    Ok(Json(token))
}
