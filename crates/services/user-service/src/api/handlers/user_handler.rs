//! User handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use utoipa::IntoParams;

use common::{AppError, AppResult};
use domain::{
    Page, PageRequest, Sort, SortDirection, UserResponse, UserStatus, DEFAULT_PAGE_NUMBER,
    DEFAULT_PAGE_SIZE, DEFAULT_SORT_DIRECTION, DEFAULT_SORT_FIELD,
};

use crate::api::extractors::{NewUserJson, UserUpdateJson, UsernamePath};
use crate::api::state::AppState;

type UserId = WithRejection<Path<i64>, AppError>;

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_sort_by() -> String {
    DEFAULT_SORT_FIELD.to_string()
}

fn default_sort_direction() -> String {
    DEFAULT_SORT_DIRECTION.to_string()
}

/// Listing window and order
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Zero-based page number
    #[serde(default = "default_page")]
    #[param(default = 0)]
    pub page: u64,
    /// Page size, 1 to 100
    #[serde(default = "default_size")]
    #[param(default = 10)]
    pub size: u64,
    /// id, username, email, firstName, lastName, status, role, createdAt or updatedAt
    #[serde(default = "default_sort_by")]
    #[param(default = "id")]
    pub sort_by: String,
    /// ASC or DESC
    #[serde(default = "default_sort_direction")]
    #[param(default = "ASC")]
    pub sort_direction: String,
}

impl ListParams {
    fn page_request(&self) -> AppResult<PageRequest> {
        let sort = Sort::new(
            self.sort_by.parse()?,
            SortDirection::parse_lenient(&self.sort_direction),
        );
        Ok(PageRequest::new(self.page, self.size, sort)?)
    }
}

/// Search term, status filter and window
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Substring matched against username, email, first and last name
    pub query: String,
    #[serde(default)]
    #[param(inline, default = "ACTIVE")]
    pub status: UserStatus,
    #[serde(default = "default_page")]
    #[param(default = 0)]
    pub page: u64,
    #[serde(default = "default_size")]
    #[param(default = 10)]
    pub size: u64,
}

/// Target status
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusParams {
    #[param(inline)]
    pub status: UserStatus,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/search", get(search_users))
        .route("/username/:username", get(get_user_by_username))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/status", patch(update_user_status))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    NewUserJson(request): NewUserJson,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.user_service.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get user by ID, whatever its status
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): UserId,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(state.user_service.get_user_by_id(id).await?))
}

/// Get user by exact username
#[utoipa::path(
    get,
    path = "/users/username/{username}",
    tag = "Users",
    params(
        ("username" = String, Path, description = "Username")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Malformed username", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user_by_username(
    State(state): State<AppState>,
    UsernamePath(username): UsernamePath,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(state.user_service.get_user_by_username(&username).await?))
}

/// List users of every status
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(ListParams),
    responses(
        (status = 200, description = "Page of users", body = UserPage),
        (status = 400, description = "Invalid paging or sort parameters", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, AppError>,
) -> AppResult<Json<Page<UserResponse>>> {
    let page = params.page_request()?;
    Ok(Json(state.user_service.list_users(page).await?))
}

/// Search users with a given status
#[utoipa::path(
    get,
    path = "/users/search",
    tag = "Users",
    params(SearchParams),
    responses(
        (status = 200, description = "Page of matching users", body = UserPage),
        (status = 400, description = "Missing query or invalid parameters", body = ErrorResponse)
    )
)]
pub async fn search_users(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<SearchParams>, AppError>,
) -> AppResult<Json<Page<UserResponse>>> {
    let page = PageRequest::new(params.page, params.size, Sort::default())?;
    let users = state
        .user_service
        .search_users(&params.query, params.status, page)
        .await?;
    Ok(Json(users))
}

/// Replace the mutable attributes of a user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): UserId,
    UserUpdateJson(request): UserUpdateJson,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(state.user_service.update_user(id, request).await?))
}

/// Change the status of a user
#[utoipa::path(
    patch,
    path = "/users/{id}/status",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID"),
        StatusParams
    ),
    responses(
        (status = 200, description = "Status updated", body = UserResponse),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user_status(
    State(state): State<AppState>,
    WithRejection(Path(id), _): UserId,
    WithRejection(Query(params), _): WithRejection<Query<StatusParams>, AppError>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_user_status(id, params.status)
        .await?;
    Ok(Json(user))
}

/// Soft delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User marked DELETED"),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): UserId,
) -> AppResult<StatusCode> {
    state.user_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
