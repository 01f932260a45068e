//! Image segmentation backends producing region masks.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbImage};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http_client;
use crate::config::{Config, DEFAULT_SEGMENT_TILE_SIZE, INFERENCE_TIMEOUT_SECONDS};
use crate::domain::blood::{tile_masks, SegmentMask};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Splits an image into candidate regions.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Segmenter: Send + Sync {
    async fn segment(&self, image: &RgbImage) -> AppResult<Vec<SegmentMask>>;
}

/// Offline segmenter that cuts the image into fixed square tiles.
#[derive(Debug, Clone)]
pub struct TileSegmenter {
    tile_size: u32,
}

impl TileSegmenter {
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size: tile_size.max(1),
        }
    }
}

impl Default for TileSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_TILE_SIZE)
    }
}

#[async_trait]
impl Segmenter for TileSegmenter {
    async fn segment(&self, image: &RgbImage) -> AppResult<Vec<SegmentMask>> {
        Ok(tile_masks(image.width(), image.height(), self.tile_size))
    }
}

/// Remote automatic mask generator.
///
/// Sends `{"image": <base64 png>}` and expects `{"masks": [<base64 png>]}`
/// where every mask is a grayscale image of the input's size.
#[derive(Debug, Clone)]
pub struct HttpSegmenter {
    client: Client,
    url: String,
}

#[derive(Serialize)]
struct SegmentRequest {
    image: String,
}

#[derive(Deserialize)]
struct SegmentResponse {
    masks: Vec<String>,
}

impl HttpSegmenter {
    pub fn new(url: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            client: http_client(INFERENCE_TIMEOUT_SECONDS)?,
            url: url.into(),
        })
    }
}

/// Remote segmenter when `SEGMENTATION_URL` is set, tiles otherwise.
pub fn segmenter_for(config: &Config) -> AppResult<Arc<dyn Segmenter>> {
    match &config.segmentation_url {
        Some(url) => {
            tracing::info!(%url, "Using remote segmentation");
            Ok(Arc::new(HttpSegmenter::new(url.clone())?))
        }
        None => Ok(Arc::new(TileSegmenter::default())),
    }
}

/// Encode an RGB image as base64 PNG.
fn encode_png_base64(image: &RgbImage) -> AppResult<String> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| AppError::internal(format!("PNG encoding failed: {}", e)))?;
    Ok(STANDARD.encode(buffer.into_inner()))
}

fn decode_mask(encoded: &str) -> AppResult<SegmentMask> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| AppError::upstream(format!("Segmentation mask is not base64: {}", e)))?;
    let mask = image::load_from_memory(&bytes)
        .map_err(|e| AppError::upstream(format!("Segmentation mask is not an image: {}", e)))?;
    Ok(SegmentMask::from_luma(&mask.to_luma8()))
}

#[async_trait]
impl Segmenter for HttpSegmenter {
    async fn segment(&self, image: &RgbImage) -> AppResult<Vec<SegmentMask>> {
        let request = SegmentRequest {
            image: encode_png_base64(image)?,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<SegmentResponse>()
            .await?;

        response.masks.iter().map(|m| decode_mask(m)).collect()
    }
}
