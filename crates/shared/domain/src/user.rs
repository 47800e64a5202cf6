//! User domain entity and related types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Lifecycle status of a user.
///
/// `Deleted` is an ordinary value: a soft-deleted record stays in the store
/// and any status can be reached from any other status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
    Deleted,
}

impl UserStatus {
    /// All status values, in declaration order
    pub const ALL: [UserStatus; 4] = [
        UserStatus::Active,
        UserStatus::Inactive,
        UserStatus::Suspended,
        UserStatus::Deleted,
    ];

    /// Stored and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
            UserStatus::Suspended => "SUSPENDED",
            UserStatus::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidStatus(s.to_string()))
    }
}

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
    Moderator,
}

impl UserRole {
    /// Stored and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
            UserRole::Moderator => "MODERATOR",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(UserRole::User),
            "ADMIN" => Ok(UserRole::Admin),
            "MODERATOR" => Ok(UserRole::Moderator),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Stored exactly as submitted
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub status: UserStatus,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Refresh the modification timestamp.
    ///
    /// Every mutating operation calls this before persisting.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Check if user is soft deleted
    pub fn is_deleted(&self) -> bool {
        self.status == UserStatus::Deleted
    }

    /// Apply an update request.
    ///
    /// Username and role are never changed. Optional profile fields are
    /// overwritten (absent clears them); the password only when non-empty.
    pub fn apply_update(&mut self, request: UserRequest) {
        if let Some(email) = request.email {
            self.email = email;
        }
        self.first_name = request.first_name;
        self.last_name = request.last_name;
        self.phone = present_phone(request.phone);

        if let Some(password) = request.password.filter(|p| !p.is_empty()) {
            self.password = password;
        }

        self.touch();
    }

    /// Move to the given status (any transition is allowed)
    pub fn set_status(&mut self, status: UserStatus) {
        self.status = status;
        self.touch();
    }

    /// Soft delete the user
    pub fn soft_delete(&mut self) {
        self.set_status(UserStatus::Deleted);
    }
}

/// A blank phone number means no phone number.
fn present_phone(phone: Option<String>) -> Option<String> {
    phone.filter(|p| !p.trim().is_empty())
}

/// A user that has not been persisted yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub status: UserStatus,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewUser {
    /// Build an ACTIVE user from a validated creation request.
    pub fn from_request(request: UserRequest) -> Self {
        let now = Utc::now();
        Self {
            username: request.username.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
            first_name: request.first_name,
            last_name: request.last_name,
            phone: present_phone(request.phone),
            status: UserStatus::Active,
            role: request.role.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach the store-assigned id
    pub fn with_id(self, id: i64) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            status: self.status,
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// User creation/update data transfer object.
///
/// Required fields are optional here so that missing values are reported
/// by the validator rather than rejected by the deserializer.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    /// Unique login name (immutable after creation)
    #[cfg_attr(feature = "openapi", schema(example = "johndoe"))]
    pub username: Option<String>,
    /// Unique email address
    #[cfg_attr(feature = "openapi", schema(example = "john@example.com"))]
    pub email: Option<String>,
    /// Password (optional on update)
    #[cfg_attr(feature = "openapi", schema(example = "SecurePass123!"))]
    pub password: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "John"))]
    pub first_name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "Doe"))]
    pub last_name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "+1 (555) 123-4567"))]
    pub phone: Option<String>,
    /// Defaults to USER on creation, ignored on update
    pub role: Option<UserRole>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub status: UserStatus,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            status: user.status,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse::from(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> UserRequest {
        UserRequest {
            username: Some("johndoe".to_string()),
            email: Some("john@example.com".to_string()),
            password: Some("SecurePass123!".to_string()),
            first_name: Some("John".to_string()),
            last_name: Some("Doe".to_string()),
            phone: Some("+1234567890".to_string()),
            role: None,
        }
    }

    #[test]
    fn test_new_user_defaults() {
        let user = NewUser::from_request(sample_request()).with_id(1);

        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_new_user_keeps_requested_role() {
        let request = UserRequest {
            role: Some(UserRole::Moderator),
            ..sample_request()
        };

        assert_eq!(NewUser::from_request(request).role, UserRole::Moderator);
    }

    #[test]
    fn test_apply_update_keeps_username_and_password_when_empty() {
        let mut user = NewUser::from_request(sample_request()).with_id(7);
        let created_at = user.created_at;

        user.apply_update(UserRequest {
            username: Some("someoneelse".to_string()),
            email: Some("new@example.com".to_string()),
            password: Some(String::new()),
            first_name: Some("Johnny".to_string()),
            last_name: None,
            phone: None,
            role: Some(UserRole::Admin),
        });

        assert_eq!(user.username, "johndoe");
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.password, "SecurePass123!");
        assert_eq!(user.first_name.as_deref(), Some("Johnny"));
        assert_eq!(user.last_name, None);
        assert_eq!(user.phone, None);
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.created_at, created_at);
        assert!(user.updated_at >= created_at);
    }

    #[test]
    fn test_blank_phone_is_stored_as_absent() {
        let request = UserRequest {
            phone: Some(String::new()),
            ..sample_request()
        };
        assert_eq!(NewUser::from_request(request).phone, None);

        let mut user = NewUser::from_request(sample_request()).with_id(3);
        user.apply_update(UserRequest {
            phone: Some("  ".to_string()),
            ..sample_request()
        });
        assert_eq!(user.phone, None);
    }

    #[test]
    fn test_apply_update_replaces_non_empty_password() {
        let mut user = NewUser::from_request(sample_request()).with_id(7);

        user.apply_update(UserRequest {
            password: Some("OtherPass456?".to_string()),
            ..sample_request()
        });

        assert_eq!(user.password, "OtherPass456?");
    }

    #[test]
    fn test_soft_delete_and_reactivate() {
        let mut user = NewUser::from_request(sample_request()).with_id(3);

        user.soft_delete();
        assert!(user.is_deleted());

        user.set_status(UserStatus::Active);
        assert!(!user.is_deleted());
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in UserStatus::ALL {
            assert_eq!(status.as_str().parse::<UserStatus>(), Ok(status));
        }
        assert_eq!(
            "active".parse::<UserStatus>(),
            Err(DomainError::InvalidStatus("active".to_string()))
        );
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("MODERATOR".parse::<UserRole>(), Ok(UserRole::Moderator));
        assert!("ROOT".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_response_serializes_camel_case_without_password() {
        let user = NewUser::from_request(sample_request()).with_id(1);
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(json["firstName"], "John");
        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["role"], "USER");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("password").is_none());
    }
}
