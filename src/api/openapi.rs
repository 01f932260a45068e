//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, content_handler, generate_handler, moderation_handler, user_handler,
};
use crate::domain::{Classification, GeneratedContent, ModerationLabel, UserResponse};
use crate::services::{BloodReport, GeneratedImage, NeutralizeResponse, TokenResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sawtna API",
        version = "1.0.0",
        description = "Content moderation and generation: neutral rewriting with sensitive-term masking, classification, blood blurring and image generation"
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::token,
        user_handler::create_user,
        user_handler::get_current_user,
        content_handler::create_content,
        content_handler::list_my_content,
        generate_handler::neutralize,
        generate_handler::generate_image,
        generate_handler::generate_image_bytes,
        moderation_handler::classify_text,
        moderation_handler::classify_image,
        moderation_handler::blur_blood,
    ),
    components(
        schemas(
            UserResponse,
            GeneratedContent,
            Classification,
            ModerationLabel,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::TokenForm,
            TokenResponse,
            content_handler::CreateContentRequest,
            generate_handler::TextRequest,
            generate_handler::ImageGenerationRequest,
            NeutralizeResponse,
            GeneratedImage,
            BloodReport,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "User profile"),
        (name = "Content", description = "Stored generated content"),
        (name = "Generation", description = "Text neutralization and image generation"),
        (name = "Moderation", description = "Classification and blood blurring")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_core_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/register",
            "/generate/neutralize",
            "/moderation/blood",
            "/content/my-content",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
