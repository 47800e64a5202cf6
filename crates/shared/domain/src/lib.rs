//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the user entity, its request/response shapes, the request validator and
//! the pagination types shared by the store and the service.

pub mod constants;
pub mod error;
pub mod page;
pub mod user;
pub mod validation;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use page::{Page, PageRequest, Sort, SortDirection, SortField};
pub use user::{NewUser, User, UserRequest, UserResponse, UserRole, UserStatus};
pub use validation::{validate_user_request, FieldViolation, ValidationMode};

#[cfg(feature = "openapi")]
pub use page::UserPage;
