//! Text and image appropriateness classification.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::classification::{
    classify_text_by_keywords, image_verdict, text_verdict, top_label,
};
use crate::domain::Classification;
use crate::infra::clients::InferenceClient;

pub const IMAGE_CLASSIFIER_UNAVAILABLE: &str = "Image classifier not available";

/// Classification never fails outright; problems come back as an ERROR label.
#[async_trait]
pub trait ModerationService: Send + Sync {
    async fn classify_text(&self, text: &str) -> Classification;

    async fn classify_image(&self, image: Vec<u8>) -> Classification;
}

pub struct Moderator {
    inference: Option<Arc<dyn InferenceClient>>,
}

impl Moderator {
    /// Without an inference client text falls back to keyword rules.
    pub fn new(inference: Option<Arc<dyn InferenceClient>>) -> Self {
        Self { inference }
    }
}

#[async_trait]
impl ModerationService for Moderator {
    async fn classify_text(&self, text: &str) -> Classification {
        let Some(inference) = &self.inference else {
            return classify_text_by_keywords(text);
        };

        match inference.classify_text(text).await {
            Ok(scores) => match top_label(&scores) {
                Some(top) => text_verdict(top),
                None => Classification::failed("Classifier returned no labels"),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Text classification failed");
                Classification::failed(e.to_string())
            }
        }
    }

    async fn classify_image(&self, image: Vec<u8>) -> Classification {
        let Some(inference) = &self.inference else {
            return Classification::failed(IMAGE_CLASSIFIER_UNAVAILABLE);
        };

        if let Err(e) = image::guess_format(&image) {
            return Classification::failed(format!("Invalid image: {}", e));
        }

        match inference.classify_image(image).await {
            Ok(scores) => match top_label(&scores) {
                Some(top) => image_verdict(top),
                None => Classification::failed("Classifier returned no labels"),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Image classification failed");
                Classification::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LabelScore, ModerationLabel};
    use crate::errors::AppError;
    use crate::infra::clients::MockInferenceClient;

    fn scores(pairs: &[(&str, f32)]) -> Vec<LabelScore> {
        pairs
            .iter()
            .map(|(label, score)| LabelScore {
                label: label.to_string(),
                score: *score,
            })
            .collect()
    }

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::new(2, 2);
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn keyword_fallback_without_client() {
        let moderator = Moderator::new(None);
        let verdict = moderator.classify_text("This is SPAM").await;
        assert_eq!(verdict.label, ModerationLabel::Inappropriate);
        assert_eq!(verdict.confidence, 0.6);

        let verdict = moderator.classify_text("hello").await;
        assert_eq!(verdict.label, ModerationLabel::Appropriate);
    }

    #[tokio::test]
    async fn toxic_top_label_is_inappropriate() {
        let mut client = MockInferenceClient::new();
        client
            .expect_classify_text()
            .returning(|_| Ok(scores(&[("neutral", 0.1), ("TOXIC", 0.9)])));

        let verdict = Moderator::new(Some(Arc::new(client)))
            .classify_text("you are awful")
            .await;
        assert_eq!(verdict.label, ModerationLabel::Inappropriate);
        assert_eq!(verdict.confidence, 0.9);
    }

    #[tokio::test]
    async fn upstream_errors_become_error_label() {
        let mut client = MockInferenceClient::new();
        client
            .expect_classify_text()
            .returning(|_| Err(AppError::upstream("model loading")));

        let verdict = Moderator::new(Some(Arc::new(client)))
            .classify_text("anything")
            .await;
        assert_eq!(verdict.label, ModerationLabel::Error);
        assert_eq!(verdict.confidence, 0.0);
        assert_eq!(verdict.error.as_deref(), Some("model loading"));
    }

    #[tokio::test]
    async fn image_without_classifier_is_error() {
        let verdict = Moderator::new(None).classify_image(tiny_png()).await;
        assert_eq!(verdict.label, ModerationLabel::Error);
        assert_eq!(verdict.error.as_deref(), Some(IMAGE_CLASSIFIER_UNAVAILABLE));
    }

    #[tokio::test]
    async fn image_class_decides_verdict() {
        let mut client = MockInferenceClient::new();
        client
            .expect_classify_image()
            .returning(|_| Ok(scores(&[("violence scene", 0.7), ("cat", 0.2)])));

        let verdict = Moderator::new(Some(Arc::new(client)))
            .classify_image(tiny_png())
            .await;
        assert_eq!(verdict.label, ModerationLabel::Inappropriate);
        assert_eq!(verdict.predicted_class.as_deref(), Some("violence scene"));
    }

    #[tokio::test]
    async fn undecodable_image_never_reaches_client() {
        let mut client = MockInferenceClient::new();
        client.expect_classify_image().never();

        let verdict = Moderator::new(Some(Arc::new(client)))
            .classify_image(b"plain text".to_vec())
            .await;
        assert_eq!(verdict.label, ModerationLabel::Error);
    }
}
