//! Authentication service - Handles user authentication and authorization.
//!
//! Password hashing lives in the domain `Password` value object; repository
//! access goes through the Unit of Work.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_MINUTE, TOKEN_TYPE_BEARER};
use crate::domain::{password::UNKNOWN_USER_HASH, NewUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "bearer")
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 1800)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(
        &self,
        username: String,
        password: String,
        full_name: Option<String>,
    ) -> AppResult<User>;

    /// User whose password matches, if any
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<Option<User>>;

    /// Login and return JWT token
    async fn login(&self, username: &str, password: &str) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a bearer token to an active user
    async fn current_user(&self, token: &str) -> AppResult<User>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::minutes(config.jwt_expiration_minutes);

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_minutes * SECONDS_PER_MINUTE,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        username: String,
        password: String,
        full_name: Option<String>,
    ) -> AppResult<User> {
        if self.uow.users().find_by_username(&username).await?.is_some() {
            return Err(AppError::bad_request(
                crate::infra::repositories::USERNAME_TAKEN,
            ));
        }

        let hashed_password = Password::new(&password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                username,
                hashed_password,
                full_name,
            })
            .await?;

        tracing::info!(user_id = user.id, "Registered user");
        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> AppResult<Option<User>> {
        let user = self.uow.users().find_by_username(username).await?;

        // Verify against a dummy hash when the user is missing so both paths cost the same.
        let stored = match &user {
            Some(user) => Password::from_hash(user.hashed_password.as_str()),
            None => Password::from_hash(UNKNOWN_USER_HASH),
        };
        let password_valid = stored.verify(password);

        Ok(user.filter(|_| password_valid))
    }

    async fn login(&self, username: &str, password: &str) -> AppResult<TokenResponse> {
        let user = self
            .authenticate(username, password)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::Forbidden);
        }

        generate_token(&user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn current_user(&self, token: &str) -> AppResult<User> {
        let claims = self.verify_token(token)?;
        let user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Forbidden);
        }
        Ok(user)
    }
}
