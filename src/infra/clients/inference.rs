//! HuggingFace Inference API classifier client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{endpoint, http_client};
use crate::config::{Config, INFERENCE_TIMEOUT_SECONDS};
use crate::domain::LabelScore;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Hosted text and image classification.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn classify_text(&self, text: &str) -> AppResult<Vec<LabelScore>>;

    async fn classify_image(&self, image: Vec<u8>) -> AppResult<Vec<LabelScore>>;
}

/// Client for `POST {base}/models/{model}`.
#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    client: Client,
    base_url: String,
    token: String,
    text_model: String,
    image_model: String,
}

impl HuggingFaceClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            client: http_client(INFERENCE_TIMEOUT_SECONDS)?,
            base_url: base_url.into(),
            token: token.into(),
            text_model: text_model.into(),
            image_model: image_model.into(),
        })
    }

    /// `None` when no inference token is configured.
    pub fn from_config(config: &Config) -> AppResult<Option<Self>> {
        config
            .hf_api_token()
            .map(|token| {
                Self::new(
                    config.hf_base_url.clone(),
                    token,
                    config.text_model.clone(),
                    config.image_model.clone(),
                )
            })
            .transpose()
    }

    fn model_url(&self, model: &str) -> String {
        endpoint(&self.base_url, &format!("models/{}", model))
    }
}

/// Text pipelines answer `[[..]]` for one input, image pipelines `[..]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScoresPayload {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ScoresPayload {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            ScoresPayload::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            ScoresPayload::Flat(scores) => scores,
        }
    }
}

#[async_trait]
impl InferenceClient for HuggingFaceClient {
    async fn classify_text(&self, text: &str) -> AppResult<Vec<LabelScore>> {
        let payload = self
            .client
            .post(self.model_url(&self.text_model))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await?
            .error_for_status()?
            .json::<ScoresPayload>()
            .await?;

        Ok(payload.into_scores())
    }

    async fn classify_image(&self, image: Vec<u8>) -> AppResult<Vec<LabelScore>> {
        let payload = self
            .client
            .post(self.model_url(&self.image_model))
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await?
            .error_for_status()?
            .json::<ScoresPayload>()
            .await?;

        Ok(payload.into_scores())
    }
}
