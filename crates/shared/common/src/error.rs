//! Unified error handling for the HTTP surface.
//!
//! `AppError` is the failure taxonomy of the service; `ErrorResponse` is the
//! uniform payload every failure is mapped to before it reaches a client.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use domain::{DomainError, FieldViolation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned for every failure the client cannot act on
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Message returned for validation failures; details carry the violations
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("{0}")]
    NotFound(String),

    /// Username or email already taken (by a record of any status)
    #[error("{0}")]
    Conflict(String),

    // Validation
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::Conflict(msg) => msg.clone(),
            AppError::Validation(_) => VALIDATION_FAILED_MESSAGE.to_string(),

            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// Violations rendered as `"<field>: <message>"`, for validation failures only
    pub fn details(&self) -> Option<Vec<String>> {
        match self {
            AppError::Validation(violations) => {
                Some(violations.iter().map(ToString::to_string).collect())
            }
            _ => None,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    /// Map an error to the client payload, stamped with the current time.
    pub fn from_error(err: &AppError, path: &str) -> Self {
        let status = err.status();
        Self {
            status: status.as_u16(),
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            message: err.user_message(),
            path: normalize_path(path),
            timestamp: Utc::now(),
            details: err.details(),
        }
    }

    /// Replace the request path
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = normalize_path(path);
        self
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Strip a `uri=` transport prefix and any query string from a request path.
pub fn normalize_path(raw: &str) -> String {
    let path = raw.strip_prefix("uri=").unwrap_or(raw);
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    path.to_string()
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self.clone())).into_response();
        // Kept so the path middleware can re-render with the request path.
        response.extensions_mut().insert(self);
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ErrorResponse::from_error(&self, "").into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Validation(vec![FieldViolation::new(err.field(), err.to_string())])
    }
}

impl From<Vec<FieldViolation>> for AppError {
    fn from(violations: Vec<FieldViolation>) -> Self {
        AppError::Validation(violations)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![FieldViolation::new("body", rejection.body_text())])
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(vec![FieldViolation::new("query", rejection.body_text())])
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(vec![FieldViolation::new("id", rejection.body_text())])
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, message: impl FnOnce() -> String) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, message: impl FnOnce() -> String) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(message()))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_not_found_payload() {
        let err = AppError::not_found("User not found with id: 123");
        let body = ErrorResponse::from_error(&err, "uri=/api/v1/users");

        assert_eq!(body.status, 404);
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.message, "User not found with id: 123");
        assert_eq!(body.path, "/api/v1/users");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_conflict_payload() {
        let err = AppError::conflict("Username already exists: johndoe");
        let body = ErrorResponse::from_error(&err, "/users");

        assert_eq!(body.status, 409);
        assert_eq!(body.error, "Conflict");
        assert_eq!(body.message, "Username already exists: johndoe");
    }

    #[test]
    fn test_validation_payload_lists_every_violation() {
        let err = AppError::Validation(vec![
            FieldViolation::new("username", "must not be blank"),
            FieldViolation::new("email", "must be a valid email"),
        ]);
        let body = ErrorResponse::from_error(&err, "/users");

        assert_eq!(body.status, 400);
        assert_eq!(body.error, "Bad Request");
        assert_eq!(body.message, "Validation failed");
        let details = body.details.unwrap();
        assert_eq!(details.len(), 2);
        assert!(details.contains(&"username: must not be blank".to_string()));
        assert!(details.contains(&"email: must be a valid email".to_string()));
    }

    #[test]
    fn test_validation_payload_with_no_violations() {
        let body = ErrorResponse::from_error(&AppError::Validation(vec![]), "/users");

        assert_eq!(body.message, "Validation failed");
        assert_eq!(body.details, Some(vec![]));
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = AppError::internal("Unexpected database error: connection refused");
        let body = ErrorResponse::from_error(&err, "/users");

        assert_eq!(body.status, 500);
        assert_eq!(body.error, "Internal Server Error");
        assert_eq!(body.message, INTERNAL_ERROR_MESSAGE);
        assert!(body.details.is_none());
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("uri=/api/v1/users/123"), "/api/v1/users/123");
        assert_eq!(normalize_path("/users/search?query=doe"), "/users/search");
        assert_eq!(normalize_path("/users"), "/users");
    }

    #[test]
    fn test_domain_error_becomes_field_violation() {
        let err = AppError::from(DomainError::InvalidSortField("password".to_string()));
        assert_eq!(
            err.details(),
            Some(vec!["sortBy: Unsupported sort field: password".to_string()])
        );
    }

    #[tokio::test]
    async fn test_into_response_renders_payload() {
        let response = AppError::not_found("User not found with id: 9").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorResponse>().is_some());

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 404);
        assert_eq!(body["message"], "User not found with id: 9");
        assert!(body.get("details").is_none());
        assert!(body.get("timestamp").is_some());
    }
}
