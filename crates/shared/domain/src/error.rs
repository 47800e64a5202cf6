//! Domain-level errors.
//!
//! These errors represent values that cannot be turned into domain types.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors raised while parsing or building domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unknown user status value
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Unknown user role value
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Sort property not supported by listings
    #[error("Unsupported sort field: {0}")]
    InvalidSortField(String),

    /// Page size outside the allowed window
    #[error("Page size must be between 1 and {max}, got {size}")]
    InvalidPageSize { size: u64, max: u64 },

    /// Page window starting beyond what a store can address
    #[error("Page number is too large: {0}")]
    InvalidPageNumber(u64),
}

impl DomainError {
    /// Name of the request field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            DomainError::InvalidStatus(_) => "status",
            DomainError::InvalidRole(_) => "role",
            DomainError::InvalidSortField(_) => "sortBy",
            DomainError::InvalidPageSize { .. } => "size",
            DomainError::InvalidPageNumber(_) => "page",
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
