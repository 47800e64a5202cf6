//! User repository backed by Postgres through SeaORM.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{NewUser, PageRequest, SortDirection, SortField, User, UserStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Records are never physically removed; soft-deleted users are returned by
/// every query like any other status.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Check whether any record (of any status) holds the username
    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    /// Check whether any record (of any status) holds the email
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// One window of all users plus the total number of users
    async fn find_all(&self, page: &PageRequest) -> AppResult<(Vec<User>, u64)>;

    /// One window of users with the given status whose username, email,
    /// first name or last name contains `query` case-insensitively, plus the
    /// total number of matches
    async fn search(
        &self,
        query: &str,
        status: UserStatus,
        page: &PageRequest,
    ) -> AppResult<(Vec<User>, u64)>;

    /// Persist a new user and return it with its assigned id
    async fn insert(&self, user: NewUser) -> AppResult<User>;

    /// Overwrite an existing user
    async fn save(&self, user: User) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch_page(
        &self,
        select: Select<UserEntity>,
        page: &PageRequest,
    ) -> AppResult<(Vec<User>, u64)> {
        let total = select.clone().count(&self.db).await?;
        let models = apply_sort(select, page)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let users = models
            .into_iter()
            .map(User::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((users, total))
    }
}

fn sort_column(field: SortField) -> user::Column {
    match field {
        SortField::Id => user::Column::Id,
        SortField::Username => user::Column::Username,
        SortField::Email => user::Column::Email,
        SortField::FirstName => user::Column::FirstName,
        SortField::LastName => user::Column::LastName,
        SortField::Status => user::Column::Status,
        SortField::Role => user::Column::Role,
        SortField::CreatedAt => user::Column::CreatedAt,
        SortField::UpdatedAt => user::Column::UpdatedAt,
    }
}

/// Requested order, with id as tie-breaker so page windows stay disjoint.
fn apply_sort(select: Select<UserEntity>, page: &PageRequest) -> Select<UserEntity> {
    let column = sort_column(page.sort.field);
    let select = match page.sort.direction {
        SortDirection::Asc => select.order_by_asc(column),
        SortDirection::Desc => select.order_by_desc(column),
    };

    if page.sort.field == SortField::Id {
        select
    } else {
        select.order_by_asc(user::Column::Id)
    }
}

/// `%query%` lower-cased, with LIKE wildcards in the query taken literally.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn matches_query(query: &str) -> Condition {
    let pattern = contains_pattern(query);
    [
        user::Column::Username,
        user::Column::Email,
        user::Column::FirstName,
        user::Column::LastName,
    ]
    .into_iter()
    .fold(Condition::any(), |condition, column| {
        condition.add(
            Expr::expr(Func::lower(Expr::col(column)))
                .like(LikeExpr::new(pattern.clone()).escape('\\')),
        )
    })
}

/// Conflict for a unique-index violation; the email index unless the
/// driver's detail names the username column or index.
fn unique_violation(detail: &str, username: &str, email: &str) -> AppError {
    if detail.contains("username") {
        AppError::conflict(format!("Username already exists: {}", username))
    } else {
        AppError::conflict(format!("Email already exists: {}", email))
    }
}

/// Surface unique-index violations raised by the write itself as conflicts.
fn map_write_error(err: DbErr, username: &str, email: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            unique_violation(&detail, username, email)
        }
        _ => AppError::from(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<(Vec<User>, u64)> {
        self.fetch_page(UserEntity::find(), page).await
    }

    async fn search(
        &self,
        query: &str,
        status: UserStatus,
        page: &PageRequest,
    ) -> AppResult<(Vec<User>, u64)> {
        let select = UserEntity::find()
            .filter(user::Column::Status.eq(status.as_str()))
            .filter(matches_query(query));

        self.fetch_page(select, page).await
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let (username, email) = (user.username.clone(), user.email.clone());

        let model = ActiveModel::from(user)
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, &username, &email))?;

        User::try_from(model)
    }

    async fn save(&self, user: User) -> AppResult<User> {
        let (id, username, email) = (user.id, user.username.clone(), user.email.clone());

        let model = ActiveModel::from(user)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => {
                    AppError::not_found(format!("User not found with id: {}", id))
                }
                other => map_write_error(other, &username, &email),
            })?;

        User::try_from(model)
    }
}
