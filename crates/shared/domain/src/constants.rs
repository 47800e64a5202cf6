//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Username
// =============================================================================

/// Minimum username length
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length
pub const MAX_USERNAME_LENGTH: usize = 50;

// =============================================================================
// Email
// =============================================================================

/// Maximum email length
pub const MAX_EMAIL_LENGTH: usize = 100;

// =============================================================================
// Password
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 100;

// =============================================================================
// Profile
// =============================================================================

/// Maximum first/last name length
pub const MAX_NAME_LENGTH: usize = 50;

// =============================================================================
// Pagination
// =============================================================================

/// Default zero-based page number
pub const DEFAULT_PAGE_NUMBER: u64 = 0;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default sort property for listings
pub const DEFAULT_SORT_FIELD: &str = "id";

/// Default sort direction for listings
pub const DEFAULT_SORT_DIRECTION: &str = "ASC";
