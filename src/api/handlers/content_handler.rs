//! Generated content handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{GeneratedContent, NewContent};
use crate::errors::AppResult;
use crate::types::PaginationParams;

/// Content creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateContentRequest {
    #[validate(length(min = 1, max = 50, message = "content_type must be 1-50 characters"))]
    #[schema(example = "text")]
    pub content_type: String,
    #[validate(length(max = 255, message = "title must be at most 255 characters"))]
    pub title: Option<String>,
    pub text: Option<String>,
    pub image_path: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub content_metadata: Option<serde_json::Value>,
    /// Ignored, the authenticated user always owns the content
    pub user_id: Option<i32>,
}

impl From<CreateContentRequest> for NewContent {
    fn from(req: CreateContentRequest) -> Self {
        NewContent {
            content_type: req.content_type,
            title: req.title,
            text: req.text,
            image_path: req.image_path,
            metadata: req.content_metadata,
        }
    }
}

pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/content", post(create_content))
        .route("/content/", post(create_content))
        .route("/content/my-content", get(list_my_content))
}

/// Store content for the authenticated user
#[utoipa::path(
    post,
    path = "/content/",
    tag = "Content",
    security(("bearer_auth" = [])),
    request_body = CreateContentRequest,
    responses(
        (status = 200, description = "Content stored", body = GeneratedContent),
        (status = 400, description = "Error creating content"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_content(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateContentRequest>,
) -> AppResult<Json<GeneratedContent>> {
    let content = state
        .services
        .content()
        .create_content(current_user.id, payload.into())
        .await?;

    Ok(Json(content))
}

/// List the authenticated user's content
#[utoipa::path(
    get,
    path = "/content/my-content",
    tag = "Content",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "User content", body = Vec<GeneratedContent>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_my_content(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<GeneratedContent>>> {
    let contents = state
        .services
        .content()
        .list_content(current_user.id, params.skip, params.limit())
        .await?;

    Ok(Json(contents))
}
