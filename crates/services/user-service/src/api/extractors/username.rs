//! Username path segment extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use common::AppError;
use domain::FieldViolation;

/// `:username` path segment; a segment that cannot be decoded is reported
/// as a violation on `username`.
pub struct UsernamePath(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UsernamePath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(username) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::Validation(vec![FieldViolation::new("username", rejection.body_text())])
            })?;
        Ok(Self(username))
    }
}
