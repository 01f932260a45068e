//! Classification and blood-blur handlers.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    response::Json,
    routing::post,
    Router,
};

use super::generate_handler::TextRequest;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::MAX_UPLOAD_BYTES;
use crate::domain::Classification;
use crate::errors::{AppError, AppResult};
use crate::infra::MediaStore;
use crate::services::BloodReport;

pub fn moderation_routes() -> Router<AppState> {
    Router::new()
        .route("/text", post(classify_text))
        .route("/image", post(classify_image))
        .route("/blood", post(blur_blood))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Contents and client file name of the `file` part.
async fn read_file_field(mut multipart: Multipart) -> AppResult<(Option<String>, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_owned);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;
        if data.is_empty() {
            return Err(AppError::bad_request("Uploaded file is empty"));
        }
        return Ok((file_name, data));
    }
    Err(AppError::bad_request("Missing multipart field 'file'"))
}

/// Classify text as appropriate or not
#[utoipa::path(
    post,
    path = "/moderation/text",
    tag = "Moderation",
    security(("bearer_auth" = [])),
    request_body = TextRequest,
    responses(
        (status = 200, description = "Verdict", body = Classification),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn classify_text(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TextRequest>,
) -> AppResult<Json<Classification>> {
    Ok(Json(
        state.services.moderation().classify_text(&payload.text).await,
    ))
}

/// Classify an uploaded image
#[utoipa::path(
    post,
    path = "/moderation/image",
    tag = "Moderation",
    security(("bearer_auth" = [])),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Image in the `file` part"),
    responses(
        (status = 200, description = "Verdict", body = Classification),
        (status = 400, description = "Missing or empty file"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn classify_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<Classification>> {
    let (_, data) = read_file_field(multipart).await?;
    Ok(Json(
        state.services.moderation().classify_image(data.to_vec()).await,
    ))
}

/// Blur blood regions of an uploaded image
#[utoipa::path(
    post,
    path = "/moderation/blood",
    tag = "Moderation",
    security(("bearer_auth" = [])),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Image in the `file` part"),
    responses(
        (status = 200, description = "Blurred copy written", body = BloodReport),
        (status = 400, description = "Missing file or invalid image"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn blur_blood(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<BloodReport>> {
    let (file_name, data) = read_file_field(multipart).await?;
    let name = MediaStore::upload_name(file_name.as_deref());
    let path = state.media.save(&name, &data).await?;

    let report = state.services.blood().blur_blood_regions(&path).await?;
    Ok(Json(report))
}
