//! Read-through cache in front of a [`UserService`].

use std::sync::Arc;

use async_trait::async_trait;

use common::AppResult;
use domain::{Page, PageRequest, UserRequest, UserResponse, UserStatus};

use super::UserService;
use crate::infra::UserCache;

/// Caches single-user lookups by id and evicts them on every mutation.
///
/// Cache failures never fail a request: they are logged and the inner
/// service answers as if no cache were configured.
pub struct CachedUserService<S> {
    inner: S,
    cache: Arc<dyn UserCache>,
}

impl<S: UserService> CachedUserService<S> {
    pub fn new(inner: S, cache: Arc<dyn UserCache>) -> Self {
        Self { inner, cache }
    }

    async fn evict(&self, id: i64) {
        if let Err(e) = self.cache.invalidate_user(id).await {
            tracing::warn!(user_id = id, error = %e, "Failed to evict cached user");
        }
    }
}

#[async_trait]
impl<S: UserService> UserService for CachedUserService<S> {
    async fn create_user(&self, request: UserRequest) -> AppResult<UserResponse> {
        self.inner.create_user(request).await
    }

    async fn get_user_by_id(&self, id: i64) -> AppResult<UserResponse> {
        match self.cache.get_user(id).await {
            Ok(Some(user)) => {
                tracing::debug!(user_id = id, "User cache hit");
                return Ok(user);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(user_id = id, error = %e, "User cache read failed"),
        }

        let user = self.inner.get_user_by_id(id).await?;

        // A mutation evicting between the read above and this write leaves the
        // old user cached until the entry's TTL expires.
        if let Err(e) = self.cache.set_user(&user).await {
            tracing::warn!(user_id = id, error = %e, "User cache write failed");
        }
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<UserResponse> {
        self.inner.get_user_by_username(username).await
    }

    async fn list_users(&self, page: PageRequest) -> AppResult<Page<UserResponse>> {
        self.inner.list_users(page).await
    }

    async fn search_users(
        &self,
        query: &str,
        status: UserStatus,
        page: PageRequest,
    ) -> AppResult<Page<UserResponse>> {
        self.inner.search_users(query, status, page).await
    }

    async fn update_user(&self, id: i64, request: UserRequest) -> AppResult<UserResponse> {
        let result = self.inner.update_user(id, request).await;
        self.evict(id).await;
        result
    }

    async fn update_user_status(&self, id: i64, status: UserStatus) -> AppResult<UserResponse> {
        let result = self.inner.update_user_status(id, status).await;
        self.evict(id).await;
        result
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        let result = self.inner.delete_user(id).await;
        self.evict(id).await;
        result
    }
}
