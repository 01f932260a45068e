//! Text neutralization and image generation handlers.

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Json},
    routing::post,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::{DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH};
use crate::errors::AppResult;
use crate::infra::clients::ImageRequest;
use crate::services::{GeneratedImage, NeutralizeResponse};

/// Free text to process
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TextRequest {
    #[validate(length(min = 1, max = 5000, message = "text must be 1-5000 characters"))]
    #[schema(example = "The occupation forces committed a massacre.")]
    pub text: String,
}

/// Text-to-image parameters
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ImageGenerationRequest {
    #[validate(length(min = 1, max = 5000, message = "prompt must be 1-5000 characters"))]
    #[schema(example = "olive trees at dusk")]
    pub prompt: String,
    #[validate(range(min = 1, max = 2048, message = "width must be 1-2048"))]
    #[schema(example = 1024)]
    pub width: Option<u32>,
    #[validate(range(min = 1, max = 2048, message = "height must be 1-2048"))]
    #[schema(example = 1024)]
    pub height: Option<u32>,
    /// Zero or absent means a random image
    pub seed: Option<u64>,
}

impl From<ImageGenerationRequest> for ImageRequest {
    fn from(req: ImageGenerationRequest) -> Self {
        ImageRequest {
            prompt: req.prompt,
            width: req.width.unwrap_or(DEFAULT_IMAGE_WIDTH),
            height: req.height.unwrap_or(DEFAULT_IMAGE_HEIGHT),
            seed: req.seed,
        }
    }
}

pub fn generate_routes() -> Router<AppState> {
    Router::new()
        .route("/neutralize", post(neutralize))
        .route("/image", post(generate_image))
        .route("/image/bytes", post(generate_image_bytes))
}

/// Rewrite text neutrally, mask flagged terms and store the result
#[utoipa::path(
    post,
    path = "/generate/neutralize",
    tag = "Generation",
    security(("bearer_auth" = [])),
    request_body = TextRequest,
    responses(
        (status = 200, description = "Neutralized text", body = NeutralizeResponse),
        (status = 400, description = "Validation error or save failure"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "LLM call failed")
    )
)]
pub async fn neutralize(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<TextRequest>,
) -> AppResult<Json<NeutralizeResponse>> {
    let response = state
        .services
        .sanitizer()
        .neutralize(current_user.id, &payload.text)
        .await?;

    Ok(Json(response))
}

/// Generate an image, save it under the media directory and record it
#[utoipa::path(
    post,
    path = "/generate/image",
    tag = "Generation",
    security(("bearer_auth" = [])),
    request_body = ImageGenerationRequest,
    responses(
        (status = 200, description = "Stored image", body = GeneratedImage),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Image service failed")
    )
)]
pub async fn generate_image(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ImageGenerationRequest>,
) -> AppResult<Json<GeneratedImage>> {
    let generated = state
        .services
        .images()
        .generate_for_user(current_user.id, payload.into())
        .await?;

    Ok(Json(generated))
}

/// Generate an image and return it directly as PNG
#[utoipa::path(
    post,
    path = "/generate/image/bytes",
    tag = "Generation",
    security(("bearer_auth" = [])),
    request_body = ImageGenerationRequest,
    responses(
        (status = 200, description = "PNG image", content_type = "image/png"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Image service failed")
    )
)]
pub async fn generate_image_bytes(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ImageGenerationRequest>,
) -> AppResult<impl IntoResponse> {
    let png = state.services.images().generate_png(payload.into()).await?;
    Ok(([(CONTENT_TYPE, "image/png")], png))
}
