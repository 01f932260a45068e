//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::User;
use crate::errors::AppError;

/// Authenticated, active user resolved from the bearer token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub user: User,
}

/// Token part of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)
}

/// JWT authentication middleware.
///
/// Loads the token's user and injects `CurrentUser` into the request
/// extensions. Unknown users are 401, inactive ones 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let user = state.services.auth().current_user(token).await?;

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username.clone(),
        user,
    });

    Ok(next.run(request).await)
}
