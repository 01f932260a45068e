//! Outbound HTTP clients for the services this API delegates to.
//!
//! Every client sits behind a trait so services can be exercised with
//! mocks or a local stand-in server.

mod image_generator;
mod inference;
mod llm;
mod segmentation;

pub use image_generator::{build_image_url, ImageGenerator, ImageRequest, PollinationsClient};
pub use inference::{HuggingFaceClient, InferenceClient};
pub use llm::{CompletionRequest, GroqClient, LlmClient};
pub use segmentation::{segmenter_for, HttpSegmenter, Segmenter, TileSegmenter};

#[cfg(any(test, feature = "test-utils"))]
pub use image_generator::MockImageGenerator;
#[cfg(any(test, feature = "test-utils"))]
pub use inference::MockInferenceClient;
#[cfg(any(test, feature = "test-utils"))]
pub use llm::MockLlmClient;
#[cfg(any(test, feature = "test-utils"))]
pub use segmentation::MockSegmenter;

use std::time::Duration;

use crate::errors::{AppError, AppResult};

/// Shared reqwest client with a per-request timeout.
fn http_client(timeout_seconds: u64) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))
}

/// Join a base URL and a path without doubling slashes.
fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
