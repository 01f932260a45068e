//! Text-to-image generation.

use async_trait::async_trait;
use chrono::Utc;
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::CONTENT_TYPE_IMAGE;
use crate::domain::NewContent;
use crate::errors::{AppError, AppResult};
use crate::infra::clients::{ImageGenerator, ImageRequest};
use crate::infra::{MediaStore, UnitOfWork};

pub const GENERATED_IMAGE_TITLE: &str = "Generated Image";

/// Result of `POST /generate/image`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeneratedImage {
    /// Where the PNG was written
    pub image_path: String,
    /// Id of the stored content row
    pub content_id: i32,
}

#[async_trait]
pub trait ImageService: Send + Sync {
    /// Raw bytes as returned by the generator
    async fn generate_image_bytes(&self, request: ImageRequest) -> AppResult<Vec<u8>>;

    /// Generated image re-encoded as PNG
    async fn generate_png(&self, request: ImageRequest) -> AppResult<Vec<u8>>;

    /// Generate, re-encode as PNG and write into the media directory
    async fn generate_image(&self, request: ImageRequest) -> AppResult<String>;

    /// `generate_image` plus a content row owned by `user_id`
    async fn generate_for_user(
        &self,
        user_id: i32,
        request: ImageRequest,
    ) -> AppResult<GeneratedImage>;
}

pub struct ImageStudio<U: UnitOfWork> {
    uow: Arc<U>,
    generator: Arc<dyn ImageGenerator>,
    media: MediaStore,
}

impl<U: UnitOfWork> ImageStudio<U> {
    pub fn new(uow: Arc<U>, generator: Arc<dyn ImageGenerator>, media: MediaStore) -> Self {
        Self {
            uow,
            generator,
            media,
        }
    }
}

/// Decode whatever the generator sent and re-encode it as PNG.
pub fn to_png(bytes: &[u8]) -> AppResult<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| AppError::upstream(format!("Generator returned an invalid image: {}", e)))?;
    let mut png = Cursor::new(Vec::new());
    decoded
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| AppError::internal(format!("PNG encoding failed: {}", e)))?;
    Ok(png.into_inner())
}

#[async_trait]
impl<U: UnitOfWork> ImageService for ImageStudio<U> {
    async fn generate_image_bytes(&self, request: ImageRequest) -> AppResult<Vec<u8>> {
        if request.prompt.trim().is_empty() {
            return Err(AppError::validation("Prompt must not be empty"));
        }
        self.generator.generate(request).await
    }

    async fn generate_png(&self, request: ImageRequest) -> AppResult<Vec<u8>> {
        let bytes = self.generate_image_bytes(request).await?;
        tokio::task::spawn_blocking(move || to_png(&bytes))
            .await
            .map_err(|e| AppError::internal(format!("Image task failed: {}", e)))?
    }

    async fn generate_image(&self, request: ImageRequest) -> AppResult<String> {
        let png = self.generate_png(request).await?;
        let name = MediaStore::generated_image_name(Utc::now().timestamp());
        let path = self.media.save(&name, &png).await?;
        tracing::info!(path = %path.display(), "Generated image saved");
        Ok(path.to_string_lossy().into_owned())
    }

    async fn generate_for_user(
        &self,
        user_id: i32,
        request: ImageRequest,
    ) -> AppResult<GeneratedImage> {
        let metadata = json!({
            "prompt": request.prompt,
            "width": request.width,
            "height": request.height,
            "seed": request.seed,
        });
        let image_path = self.generate_image(request).await?;

        let content = NewContent::new(CONTENT_TYPE_IMAGE)
            .title(GENERATED_IMAGE_TITLE)
            .image_path(image_path.as_str())
            .metadata(metadata);

        let saved = self
            .uow
            .contents()
            .create(user_id, content)
            .await
            .map_err(|e| {
                tracing::warn!(user_id, error = %e, "Saving generated image failed");
                AppError::bad_request(super::sanitizer_service::SAVE_FAILED)
            })?;

        Ok(GeneratedImage {
            image_path,
            content_id: saved.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeneratedContent;
    use crate::infra::clients::MockImageGenerator;
    use crate::infra::repositories::{MockContentRepository, MockUserRepository};
    use crate::infra::{ContentRepository, UserRepository};
    use image::{ImageBuffer, Rgb};

    #[test]
    fn to_png_reencodes_jpeg() {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(4, 4, Rgb([200, 10, 10]));
        let mut jpeg = Cursor::new(Vec::new());
        img.write_to(&mut jpeg, ImageFormat::Jpeg).unwrap();

        let png = to_png(&jpeg.into_inner()).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
    }

    struct TestUow {
        contents: Arc<MockContentRepository>,
    }

    impl UnitOfWork for TestUow {
        fn users(&self) -> Arc<dyn UserRepository> {
            Arc::new(MockUserRepository::new())
        }

        fn contents(&self) -> Arc<dyn ContentRepository> {
            self.contents.clone()
        }
    }

    fn jpeg_bytes() -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(8, 8, Rgb([0, 90, 200]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn generate_for_user_saves_png_and_row() {
        let dir = tempfile::tempdir().unwrap();

        let mut generator = MockImageGenerator::new();
        generator
            .expect_generate()
            .withf(|req| req.prompt == "olive trees" && req.width == 512)
            .returning(|_| Ok(jpeg_bytes()));

        let mut contents = MockContentRepository::new();
        contents
            .expect_create()
            .withf(|user_id, content| {
                *user_id == 4
                    && content.content_type == "image"
                    && content.title.as_deref() == Some(GENERATED_IMAGE_TITLE)
                    && content.metadata
                        == Some(json!({"prompt": "olive trees", "width": 512, "height": 256, "seed": 7}))
            })
            .returning(|user_id, content| {
                Ok(GeneratedContent {
                    id: 12,
                    user_id,
                    content_type: content.content_type,
                    title: content.title,
                    text: None,
                    image_path: content.image_path,
                    metadata: content.metadata,
                    created_at: Utc::now(),
                })
            });

        let studio = ImageStudio::new(
            Arc::new(TestUow {
                contents: Arc::new(contents),
            }),
            Arc::new(generator),
            MediaStore::new(dir.path()),
        );

        let generated = studio
            .generate_for_user(
                4,
                ImageRequest {
                    prompt: "olive trees".into(),
                    width: 512,
                    height: 256,
                    seed: Some(7),
                },
            )
            .await
            .unwrap();

        assert_eq!(generated.content_id, 12);
        assert!(generated.image_path.contains("generated_image_"));
        let written = std::fs::read(&generated.image_path).unwrap();
        assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Png);
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = MockImageGenerator::new();
        generator.expect_generate().never();

        let studio = ImageStudio::new(
            Arc::new(TestUow {
                contents: Arc::new(MockContentRepository::new()),
            }),
            Arc::new(generator),
            MediaStore::new(dir.path()),
        );
        let err = studio
            .generate_image_bytes(ImageRequest {
                prompt: "  ".into(),
                width: 1024,
                height: 1024,
                seed: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn to_png_rejects_garbage() {
        let err = to_png(b"not an image").unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
