//! Blood region detection and blurring.

use async_trait::async_trait;
use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::BLOOD_BLUR_SIGMA;
use crate::domain::blood::{blur_regions, blurred_output_path, is_blood_region};
use crate::errors::{AppError, AppResult};
use crate::infra::clients::Segmenter;

/// Outcome of one blur run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BloodReport {
    /// Path of the written image
    pub output_path: String,
    /// Number of regions classified as blood
    pub blood_regions: usize,
}

#[async_trait]
pub trait BloodService: Send + Sync {
    /// Blur red-dominant regions of the image at `path` into a sibling file.
    async fn blur_blood_regions(&self, path: &Path) -> AppResult<BloodReport>;
}

pub struct BloodDetector {
    segmenter: Arc<dyn Segmenter>,
}

impl BloodDetector {
    pub fn new(segmenter: Arc<dyn Segmenter>) -> Self {
        Self { segmenter }
    }
}

async fn blocking<T, F>(task: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::internal(format!("Image task failed: {}", e)))?
}

#[async_trait]
impl BloodService for BloodDetector {
    async fn blur_blood_regions(&self, path: &Path) -> AppResult<BloodReport> {
        let input = path.to_path_buf();
        let image: RgbImage = blocking(move || Ok(image::open(&input)?.to_rgb8())).await?;

        let masks = self.segmenter.segment(&image).await?;
        let total = masks.len();

        let output_path: PathBuf = blurred_output_path(path);
        let target = output_path.clone();
        let blood_regions = blocking(move || {
            let blood: Vec<_> = masks
                .iter()
                .filter(|mask| is_blood_region(&image, mask))
                .collect();
            let output = blur_regions(&image, &blood, BLOOD_BLUR_SIGMA);
            let format = ImageFormat::from_path(&target).unwrap_or(ImageFormat::Png);
            output.save_with_format(&target, format)?;
            Ok(blood.len())
        })
        .await?;

        tracing::info!(
            path = %output_path.display(),
            regions = total,
            blood_regions,
            "Blurred blood regions"
        );

        Ok(BloodReport {
            output_path: output_path.to_string_lossy().into_owned(),
            blood_regions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::clients::{MockSegmenter, TileSegmenter};
    use image::Rgb;

    fn half_red_image(path: &Path) {
        let img = RgbImage::from_fn(64, 64, |x, _| {
            if x < 32 {
                Rgb([200, 20, 20])
            } else {
                Rgb([20, 160, 40])
            }
        });
        img.save(path).unwrap();
    }

    #[tokio::test]
    async fn counts_and_blurs_red_tiles() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scene.png");
        half_red_image(&input);

        let detector = BloodDetector::new(Arc::new(TileSegmenter::new(32)));
        let report = detector.blur_blood_regions(&input).await.unwrap();

        assert_eq!(report.blood_regions, 2);
        let expected = dir.path().join("scene_blood_blurred.png");
        assert_eq!(report.output_path, expected.to_string_lossy());
        assert!(expected.exists());
    }

    #[tokio::test]
    async fn writes_output_even_without_regions() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.png");
        half_red_image(&input);

        let mut segmenter = MockSegmenter::new();
        segmenter.expect_segment().returning(|_| Ok(vec![]));

        let report = BloodDetector::new(Arc::new(segmenter))
            .blur_blood_regions(&input)
            .await
            .unwrap();
        assert_eq!(report.blood_regions, 0);
        assert!(Path::new(&report.output_path).exists());
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let detector = BloodDetector::new(Arc::new(TileSegmenter::default()));
        let err = detector
            .blur_blood_regions(&dir.path().join("nope.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
