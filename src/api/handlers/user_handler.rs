//! User handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use super::auth_handler::RegisterRequest;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;

/// Public registration under the legacy `/users` path
pub fn registration_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/", post(create_user))
}

/// Routes that need an authenticated user
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(get_current_user))
}

/// Register a new user (legacy path)
#[utoipa::path(
    post,
    path = "/users/",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error or username already registered")
    )
)]
pub async fn create_user(
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

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Inactive user")
    )
)]
pub async fn get_current_user(
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(UserResponse::from(current_user.user)))
}
