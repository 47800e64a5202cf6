//! Service layer - business logic.

mod cached;
mod user_service;

pub use cached::CachedUserService;
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
