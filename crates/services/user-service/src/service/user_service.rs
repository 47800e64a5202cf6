//! User service - user lifecycle use cases.
//!
//! Requests reaching this layer have already passed validation; the service
//! enforces uniqueness, existence and the status rules.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{NewUser, Page, PageRequest, User, UserRequest, UserResponse, UserStatus};

use crate::repository::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
///
/// Soft-deleted users are visible to every read.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create an ACTIVE user; username and email must be unused
    async fn create_user(&self, request: UserRequest) -> AppResult<UserResponse>;

    async fn get_user_by_id(&self, id: i64) -> AppResult<UserResponse>;

    async fn get_user_by_username(&self, username: &str) -> AppResult<UserResponse>;

    /// One page of all users regardless of status
    async fn list_users(&self, page: PageRequest) -> AppResult<Page<UserResponse>>;

    /// One page of users with `status` matching `query`
    async fn search_users(
        &self,
        query: &str,
        status: UserStatus,
        page: PageRequest,
    ) -> AppResult<Page<UserResponse>>;

    /// Overwrite the mutable attributes of a user
    async fn update_user(&self, id: i64, request: UserRequest) -> AppResult<UserResponse>;

    /// Move a user to any status, including back from DELETED
    async fn update_user_status(&self, id: i64, status: UserStatus) -> AppResult<UserResponse>;

    /// Soft delete: the record stays readable with status DELETED
    async fn delete_user(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    async fn find_existing(&self, id: i64) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_not_found(|| format!("User not found with id: {}", id))
    }
}

fn to_page(users: Vec<User>, page: &PageRequest, total: u64) -> Page<UserResponse> {
    Page::new(users, page, total).map(UserResponse::from)
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, request: UserRequest) -> AppResult<UserResponse> {
        let username = request.username.clone().unwrap_or_default();
        let email = request.email.clone().unwrap_or_default();
        tracing::info!(username = %username, "Creating user");

        if self.repo.exists_by_username(&username).await? {
            return Err(AppError::conflict(format!(
                "Username already exists: {}",
                username
            )));
        }
        if self.repo.exists_by_email(&email).await? {
            return Err(AppError::conflict(format!("Email already exists: {}", email)));
        }

        let user = self.repo.insert(NewUser::from_request(request)).await?;

        tracing::info!(user_id = user.id, username = %user.username, "User created");
        Ok(user.into())
    }

    async fn get_user_by_id(&self, id: i64) -> AppResult<UserResponse> {
        tracing::info!(user_id = id, "Fetching user by id");
        Ok(self.find_existing(id).await?.into())
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<UserResponse> {
        tracing::info!(username = %username, "Fetching user by username");
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or_not_found(|| format!("User not found with username: {}", username))?;

        Ok(user.into())
    }

    async fn list_users(&self, page: PageRequest) -> AppResult<Page<UserResponse>> {
        tracing::info!(
            page = page.page,
            size = page.size,
            sort_by = %page.sort.field,
            "Listing users"
        );
        let (users, total) = self.repo.find_all(&page).await?;
        Ok(to_page(users, &page, total))
    }

    async fn search_users(
        &self,
        query: &str,
        status: UserStatus,
        page: PageRequest,
    ) -> AppResult<Page<UserResponse>> {
        tracing::info!(query = %query, status = %status, "Searching users");
        let (users, total) = self.repo.search(query, status, &page).await?;
        Ok(to_page(users, &page, total))
    }

    async fn update_user(&self, id: i64, request: UserRequest) -> AppResult<UserResponse> {
        tracing::info!(user_id = id, "Updating user");
        let mut user = self.find_existing(id).await?;

        if let Some(email) = request.email.as_deref() {
            if email != user.email && self.repo.exists_by_email(email).await? {
                return Err(AppError::conflict(format!("Email already exists: {}", email)));
            }
        }

        user.apply_update(request);
        let user = self.repo.save(user).await?;

        tracing::info!(user_id = id, "User updated");
        Ok(user.into())
    }

    async fn update_user_status(&self, id: i64, status: UserStatus) -> AppResult<UserResponse> {
        tracing::info!(user_id = id, status = %status, "Updating user status");
        let mut user = self.find_existing(id).await?;

        user.set_status(status);
        let user = self.repo.save(user).await?;

        Ok(user.into())
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        tracing::info!(user_id = id, "Deleting user");
        let mut user = self.find_existing(id).await?;

        user.soft_delete();
        self.repo.save(user).await?;

        tracing::info!(user_id = id, "User soft deleted");
        Ok(())
    }
}
