//! Unit of Work - Centralized repository access.
//!
//! Services receive one `UnitOfWork` and reach every repository through
//! it, so tests can swap the whole persistence layer at once.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{ContentRepository, ContentStore, UserRepository, UserStore};

/// Repository access for services.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get generated content repository
    fn contents(&self) -> Arc<dyn ContentRepository>;
}

/// Database-backed UnitOfWork sharing one connection pool.
pub struct Persistence {
    user_repo: Arc<UserStore>,
    content_repo: Arc<ContentStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            content_repo: Arc::new(ContentStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn contents(&self) -> Arc<dyn ContentRepository> {
        self.content_repo.clone()
    }
}
