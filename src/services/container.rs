//! Service container - Centralized service access.
//!
//! Handlers depend on the `ServiceContainer` trait, never on concrete
//! services, so routes can be exercised against stubs.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, BloodDetector, BloodService, ContentManager, ContentService,
    ImageService, ImageStudio, ModerationService, Moderator, Sanitizer, SanitizerService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::clients::{
    segmenter_for, GroqClient, HuggingFaceClient, InferenceClient, PollinationsClient,
};
use crate::infra::{Cache, MediaStore, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn content(&self) -> Arc<dyn ContentService>;

    fn sanitizer(&self) -> Arc<dyn SanitizerService>;

    fn moderation(&self) -> Arc<dyn ModerationService>;

    fn blood(&self) -> Arc<dyn BloodService>;

    fn images(&self) -> Arc<dyn ImageService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    content_service: Arc<dyn ContentService>,
    sanitizer_service: Arc<dyn SanitizerService>,
    moderation_service: Arc<dyn ModerationService>,
    blood_service: Arc<dyn BloodService>,
    image_service: Arc<dyn ImageService>,
}

impl Services {
    /// Wire every service against the database, cache and outbound clients.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        cache: Option<Cache>,
        config: &Config,
    ) -> AppResult<Self> {
        let uow = Arc::new(Persistence::new(db));

        let llm = Arc::new(GroqClient::from_config(config)?);
        let inference = HuggingFaceClient::from_config(config)?
            .map(|client| Arc::new(client) as Arc<dyn InferenceClient>);
        if inference.is_none() {
            tracing::info!("HF_API_TOKEN not set, using rule-based text classification");
        }
        let generator = Arc::new(PollinationsClient::from_config(config)?);
        let media = MediaStore::new(config.media_dir.clone());

        Ok(Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config.clone())),
            content_service: Arc::new(ContentManager::new(uow.clone())),
            sanitizer_service: Arc::new(Sanitizer::new(uow.clone(), llm, cache)),
            moderation_service: Arc::new(Moderator::new(inference)),
            blood_service: Arc::new(BloodDetector::new(segmenter_for(config)?)),
            image_service: Arc::new(ImageStudio::new(uow, generator, media)),
        })
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn content(&self) -> Arc<dyn ContentService> {
        self.content_service.clone()
    }

    fn sanitizer(&self) -> Arc<dyn SanitizerService> {
        self.sanitizer_service.clone()
    }

    fn moderation(&self) -> Arc<dyn ModerationService> {
        self.moderation_service.clone()
    }

    fn blood(&self) -> Arc<dyn BloodService> {
        self.blood_service.clone()
    }

    fn images(&self) -> Arc<dyn ImageService> {
        self.image_service.clone()
    }
}
