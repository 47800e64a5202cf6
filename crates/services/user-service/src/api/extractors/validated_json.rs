//! Validated JSON extractors - deserialization followed by field validation.
//!
//! A body that cannot be parsed is reported as a violation on `body`; a body
//! that parses is checked against every user field rule and all violations
//! are reported at once.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};

use common::AppError;
use domain::{validate_user_request, UserRequest, ValidationMode};

/// User creation body; the password is required.
///
/// ```rust,ignore
/// async fn create_user(NewUserJson(request): NewUserJson) {
///     // request passed every rule
/// }
/// ```
pub struct NewUserJson(pub UserRequest);

/// User update body; password rules apply only to a non-empty password.
pub struct UserUpdateJson(pub UserRequest);

async fn extract<S>(req: Request, state: &S, mode: ValidationMode) -> Result<UserRequest, AppError>
where
    S: Send + Sync,
{
    let Json(request) = Json::<UserRequest>::from_request(req, state).await?;

    let violations = validate_user_request(&request, mode);
    if !violations.is_empty() {
        tracing::debug!(count = violations.len(), ?mode, "Rejected user request");
        return Err(AppError::Validation(violations));
    }

    Ok(request)
}

#[async_trait]
impl<S> FromRequest<S> for NewUserJson
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        extract(req, state, ValidationMode::Create).await.map(Self)
    }
}

#[async_trait]
impl<S> FromRequest<S> for UserUpdateJson
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        extract(req, state, ValidationMode::Update).await.map(Self)
    }
}
