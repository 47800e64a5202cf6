//! Redis cache for user lookups.
//!
//! Values are stored as JSON under `user:<id>` with a fixed TTL.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use common::{AppError, AppResult, CacheConfig};
use domain::UserResponse;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const CACHE_PREFIX_USER: &str = "user:";

fn user_key(id: i64) -> String {
    format!("{}{}", CACHE_PREFIX_USER, id)
}

/// Cache of user representations keyed by id.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserCache: Send + Sync {
    /// Get cached user by ID.
    async fn get_user(&self, id: i64) -> AppResult<Option<UserResponse>>;

    /// Cache a user.
    async fn set_user(&self, user: &UserResponse) -> AppResult<()>;

    /// Invalidate cached user.
    async fn invalidate_user(&self, id: i64) -> AppResult<()>;
}

/// Redis-backed user cache with connection pooling.
#[derive(Clone)]
pub struct RedisUserCache {
    connection: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisUserCache {
    /// Connect to Redis.
    pub async fn connect(config: &CacheConfig) -> Result<Self, RedisError> {
        let client = Client::open(config.url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!(ttl_seconds = config.default_ttl_seconds, "Redis cache connected");

        Ok(Self {
            connection,
            ttl_seconds: config.default_ttl_seconds,
        })
    }
}

#[async_trait]
impl UserCache for RedisUserCache {
    async fn get_user(&self, id: i64) -> AppResult<Option<UserResponse>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(user_key(id)).await.map_err(cache_error)?;

        value
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Cache deserialization error: {}", e))
                })
            })
            .transpose()
    }

    async fn set_user(&self, user: &UserResponse) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(user)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(user_key(user.id), json, self.ttl_seconds)
            .await
            .map_err(cache_error)?;

        Ok(())
    }

    async fn invalidate_user(&self, id: i64) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(user_key(id)).await.map_err(cache_error)?;
        Ok(())
    }
}

fn cache_error(e: RedisError) -> AppError {
    AppError::internal(format!("Cache error: {}", e))
}
