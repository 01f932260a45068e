//! Generated content service.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::MAX_LIMIT;
use crate::domain::{GeneratedContent, NewContent};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

pub const CONTENT_CREATE_FAILED: &str = "Error creating content";

#[async_trait]
pub trait ContentService: Send + Sync {
    /// Store content owned by `user_id`
    async fn create_content(&self, user_id: i32, content: NewContent)
        -> AppResult<GeneratedContent>;

    /// Page through a user's content, `limit` capped at `MAX_LIMIT`
    async fn list_content(
        &self,
        user_id: i32,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<GeneratedContent>>;
}

pub struct ContentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ContentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ContentService for ContentManager<U> {
    async fn create_content(
        &self,
        user_id: i32,
        content: NewContent,
    ) -> AppResult<GeneratedContent> {
        self.uow
            .contents()
            .create(user_id, content)
            .await
            .map_err(|e| match e {
                AppError::Database(err) => {
                    tracing::warn!(user_id, error = %err, "Content insert failed");
                    AppError::bad_request(CONTENT_CREATE_FAILED)
                }
                other => other,
            })
    }

    async fn list_content(
        &self,
        user_id: i32,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<GeneratedContent>> {
        self.uow
            .contents()
            .list_by_user(user_id, skip, limit.min(MAX_LIMIT))
            .await
    }
}
