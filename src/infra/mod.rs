//! Infrastructure layer - External systems integration
//!
//! - Database connections and repositories
//! - Redis cache
//! - Outbound HTTP clients (LLM, inference, image generation, segmentation)
//! - Local media storage
//! - Unit of Work for repository access

pub mod cache;
pub mod clients;
pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{ContentRepository, ContentStore, UserRepository, UserStore};
pub use storage::MediaStore;
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockContentRepository, MockUserRepository};
