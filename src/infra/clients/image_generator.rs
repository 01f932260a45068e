//! Pollinations text-to-image client.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use url::Url;

use super::http_client;
use crate::config::{Config, IMAGE_GENERATION_TIMEOUT_SECONDS};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Parameters of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    /// Zero is treated as "no seed".
    pub seed: Option<u64>,
}

/// Text-to-image backend returning encoded image bytes.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: ImageRequest) -> AppResult<Vec<u8>>;
}

/// Bytes kept literal in the prompt segment: ASCII alphanumerics, `_.-~`
/// and `/`. Everything else is percent-encoded as UTF-8.
const PROMPT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// `{base}/prompt/{prompt}?width=W&height=H&nologo=true[&seed=S]`
pub fn build_image_url(base: &str, request: &ImageRequest) -> AppResult<Url> {
    let encoded = utf8_percent_encode(&request.prompt, PROMPT_ENCODE_SET);
    let raw = format!("{}/prompt/{}", base.trim_end_matches('/'), encoded);

    let mut url = Url::parse(&raw)
        .map_err(|e| AppError::internal(format!("Invalid image generation URL: {}", e)))?;
    if url.cannot_be_a_base() {
        return Err(AppError::internal("Image generation URL cannot have a path"));
    }

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("width", &request.width.to_string())
            .append_pair("height", &request.height.to_string())
            .append_pair("nologo", "true");
        if let Some(seed) = request.seed.filter(|s| *s != 0) {
            query.append_pair("seed", &seed.to_string());
        }
    }

    Ok(url)
}

/// Pollinations API client.
#[derive(Debug, Clone)]
pub struct PollinationsClient {
    client: Client,
    base_url: String,
}

impl PollinationsClient {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            client: http_client(IMAGE_GENERATION_TIMEOUT_SECONDS)?,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(config.pollinations_base_url.clone())
    }
}

#[async_trait]
impl ImageGenerator for PollinationsClient {
    async fn generate(&self, request: ImageRequest) -> AppResult<Vec<u8>> {
        let url = build_image_url(&self.base_url, &request)?;
        tracing::debug!(%url, "Requesting generated image");

        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str, seed: Option<u64>) -> ImageRequest {
        ImageRequest {
            prompt: prompt.to_string(),
            width: 1024,
            height: 768,
            seed,
        }
    }

    #[test]
    fn url_encodes_prompt_and_sets_query() {
        let url = build_image_url(
            "https://image.pollinations.ai",
            &request("olive trees at dusk", None),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://image.pollinations.ai/prompt/olive%20trees%20at%20dusk?width=1024&height=768&nologo=true"
        );
    }

    #[test]
    fn seed_is_appended_when_non_zero() {
        let url = build_image_url("https://image.pollinations.ai", &request("sea", Some(42))).unwrap();
        assert!(url.as_str().ends_with("&nologo=true&seed=42"));

        let url = build_image_url("https://image.pollinations.ai", &request("sea", Some(0))).unwrap();
        assert!(!url.as_str().contains("seed"));
    }

    #[test]
    fn prompt_punctuation_is_escaped_and_slashes_kept() {
        let url = build_image_url(
            "http://127.0.0.1:9000/",
            &request("cats/dogs, (happy)! a+b=c; x:y@z & $1 'it' *", None),
        )
        .unwrap();
        assert_eq!(
            url.path(),
            "/prompt/cats/dogs%2C%20%28happy%29%21%20a%2Bb%3Dc%3B%20x%3Ay%40z%20%26%20%241%20%27it%27%20%2A"
        );
    }

    #[test]
    fn unreserved_and_non_ascii_prompt_bytes() {
        let url = build_image_url("http://127.0.0.1:9000", &request("a_b.c-d~e سلام", None)).unwrap();
        assert_eq!(
            url.path(),
            "/prompt/a_b.c-d~e%20%D8%B3%D9%84%D8%A7%D9%85"
        );
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(build_image_url("not a url", &request("x", None)).is_err());
    }
}
