//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Message returned when a username is already in use.
pub const USERNAME_TAKEN: &str = "Username already registered";

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a new active user
    async fn create(&self, user: NewUser) -> AppResult<User>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let active_model = ActiveModel {
            username: Set(new_user.username),
            hashed_password: Set(new_user.hashed_password),
            full_name: Set(new_user.full_name),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(User::from(model)),
            // lost a race with a concurrent registration
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::bad_request(USERNAME_TAKEN))
            }
            Err(e) => Err(AppError::from(e)),
        }
    }
}
