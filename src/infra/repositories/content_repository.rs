//! Generated content repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::entities::generated_content::{self, ActiveModel, Entity as ContentEntity};
use crate::domain::{GeneratedContent, NewContent};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Content repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Insert content owned by `user_id`
    async fn create(&self, user_id: i32, content: NewContent) -> AppResult<GeneratedContent>;

    /// Page through a user's content in insertion order
    async fn list_by_user(
        &self,
        user_id: i32,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<GeneratedContent>>;
}

/// SeaORM-backed content repository
pub struct ContentStore {
    db: DatabaseConnection,
}

impl ContentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContentRepository for ContentStore {
    async fn create(&self, user_id: i32, content: NewContent) -> AppResult<GeneratedContent> {
        let active_model = ActiveModel {
            user_id: Set(user_id),
            content_type: Set(content.content_type),
            title: Set(content.title),
            text: Set(content.text),
            image_path: Set(content.image_path),
            metadata: Set(content.metadata),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(GeneratedContent::from(model))
    }

    async fn list_by_user(
        &self,
        user_id: i32,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<GeneratedContent>> {
        let models = ContentEntity::find()
            .filter(generated_content::Column::UserId.eq(user_id))
            .order_by_asc(generated_content::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(GeneratedContent::from).collect())
    }
}
