//! Redis cache implementation.
//!
//! JSON values with TTLs, fixed-window rate limit counters and the
//! memoized LLM model choice.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{
    Config, ACTIVE_MODEL_TTL_SECONDS, CACHE_KEY_ACTIVE_MODEL, CACHE_PREFIX_RATE_LIMIT,
};
use crate::errors::{AppError, AppResult};

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis.
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    // =========================================================================
    // Generic Cache Operations
    // =========================================================================

    /// Get a value from cache.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.map_err(cache_error)?;

        value
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Cache deserialization error: {}", e))
                })
            })
            .transpose()
    }

    /// Set a value in cache with custom TTL (in seconds).
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(key, json, ttl_seconds)
            .await
            .map_err(cache_error)?;

        Ok(())
    }

    /// Delete a value from cache.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await.map_err(cache_error)?;
        Ok(())
    }

    /// Check if a key exists in cache.
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.exists(key).await.map_err(cache_error)?;
        Ok(exists)
    }

    // =========================================================================
    // LLM Model Memo
    // =========================================================================

    /// Model that answered the last availability probe, if still fresh.
    pub async fn get_active_model(&self) -> AppResult<Option<String>> {
        self.get(CACHE_KEY_ACTIVE_MODEL).await
    }

    pub async fn set_active_model(&self, model: &str) -> AppResult<()> {
        self.set_with_ttl(CACHE_KEY_ACTIVE_MODEL, &model, ACTIVE_MODEL_TTL_SECONDS)
            .await
    }

    /// Forget the memoized model so the next request probes again.
    pub async fn clear_active_model(&self) -> AppResult<()> {
        self.delete(CACHE_KEY_ACTIVE_MODEL).await
    }

    // =========================================================================
    // Rate Limiting Operations
    // =========================================================================

    /// Check and increment rate limit counter.
    /// Returns (current_count, is_allowed) tuple.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = rate_limit_key(identifier);
        let mut conn = self.connection.clone();

        // INCR creates the key at 1; the first hit in a window sets its expiry
        let count: i64 = conn.incr(&key, 1).await.map_err(cache_error)?;
        if count == 1 {
            let _: () = conn
                .expire(&key, window_seconds as i64)
                .await
                .map_err(cache_error)?;
        }

        let count = count.max(0) as u64;
        Ok((count, count <= max_requests))
    }
}

fn rate_limit_key(identifier: &str) -> String {
    format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier)
}

/// Convert Redis error to AppError
fn cache_error(e: RedisError) -> AppError {
    AppError::internal(format!("Cache error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_keys_are_prefixed() {
        assert_eq!(rate_limit_key("auth:10.0.0.1"), "rate_limit:auth:10.0.0.1");
    }

    #[test]
    fn cache_errors_are_internal() {
        let err = cache_error(RedisError::from((redis::ErrorKind::IoError, "refused")));
        assert!(matches!(err, AppError::Internal(_)));
    }
}
