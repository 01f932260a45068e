//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Cache, Database, MediaStore};
use crate::services::{ServiceContainer, Services};

/// Shared state handed to every handler.
///
/// `cache` and `database` are optional so routers can be built over stub
/// services; without a cache rate limiting is skipped.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    pub cache: Option<Arc<Cache>>,
    pub database: Option<Arc<Database>>,
    /// Where uploads are written before processing
    pub media: MediaStore,
}

impl AppState {
    /// Wire the production container over a live database and cache.
    pub fn from_config(database: Arc<Database>, cache: Arc<Cache>, config: &Config) -> AppResult<Self> {
        let services = Services::from_connection(
            database.get_connection(),
            Some(cache.as_ref().clone()),
            config,
        )?;

        Ok(Self {
            services: Arc::new(services),
            cache: Some(cache),
            database: Some(database),
            media: MediaStore::new(config.media_dir.clone()),
        })
    }

    /// State over an arbitrary container, without infrastructure.
    pub fn new(services: Arc<dyn ServiceContainer>, media: MediaStore) -> Self {
        Self {
            services,
            cache: None,
            database: None,
            media,
        }
    }

    pub fn with_cache(mut self, cache: Arc<Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_database(mut self, database: Arc<Database>) -> Self {
        self.database = Some(database);
        self
    }
}
