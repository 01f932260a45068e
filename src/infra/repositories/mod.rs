//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod content_repository;
pub(crate) mod entities;
mod user_repository;

pub use content_repository::{ContentRepository, ContentStore};
pub use user_repository::{UserRepository, UserStore, USERNAME_TAKEN};

#[cfg(any(test, feature = "test-utils"))]
pub use content_repository::MockContentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
