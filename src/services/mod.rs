//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on traits so handlers and tests can
//! swap implementations.

mod auth_service;
mod blood_service;
pub mod container;
mod content_service;
mod image_service;
mod moderation_service;
mod sanitizer_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use blood_service::{BloodDetector, BloodReport, BloodService};
pub use content_service::{ContentManager, ContentService, CONTENT_CREATE_FAILED};
pub use image_service::{
    to_png, GeneratedImage, ImageService, ImageStudio, GENERATED_IMAGE_TITLE,
};
pub use moderation_service::{ModerationService, Moderator, IMAGE_CLASSIFIER_UNAVAILABLE};
pub use sanitizer_service::{
    finalize, NeutralizeResponse, Sanitizer, SanitizerService, NEUTRALIZED_TITLE, SAVE_FAILED,
};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
