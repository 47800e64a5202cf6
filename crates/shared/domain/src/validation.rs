//! Field-level validation of user requests.
//!
//! Every rule is checked and every violation reported. A blank required
//! field only reports that it is required.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::ValidateEmail;

use crate::constants::{
    MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH,
    MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH,
};
use crate::user::UserRequest;

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid username regex"));

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9\s\-()]*[0-9][0-9\s\-()]*$").expect("valid phone regex")
});

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Which operation the request is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Password is required
    Create,
    /// Password rules apply only when a non-empty password is supplied
    Update,
}

/// Validate a creation or update request, returning every violation.
pub fn validate_user_request(request: &UserRequest, mode: ValidationMode) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    validate_username(request.username.as_deref(), &mut violations);
    validate_email(request.email.as_deref(), &mut violations);

    match (mode, request.password.as_deref()) {
        (ValidationMode::Update, None) | (ValidationMode::Update, Some("")) => {}
        (_, password) => validate_password(password, &mut violations),
    }

    validate_max_length(
        "firstName",
        "First name",
        request.first_name.as_deref(),
        &mut violations,
    );
    validate_max_length(
        "lastName",
        "Last name",
        request.last_name.as_deref(),
        &mut violations,
    );

    if let Some(phone) = request.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        if !PHONE_PATTERN.is_match(phone) {
            violations.push(FieldViolation::new("phone", "Phone number format is invalid"));
        }
    }

    violations
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn validate_username(username: Option<&str>, violations: &mut Vec<FieldViolation>) {
    let Some(username) = username.filter(|_| !is_blank(username)) else {
        violations.push(FieldViolation::new("username", "Username is required"));
        return;
    };

    let len = char_len(username);
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        violations.push(FieldViolation::new(
            "username",
            format!(
                "Username must be between {} and {} characters",
                MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
            ),
        ));
    }
    if !USERNAME_PATTERN.is_match(username) {
        violations.push(FieldViolation::new(
            "username",
            "Username can only contain letters, numbers, and underscores",
        ));
    }
}

fn validate_email(email: Option<&str>, violations: &mut Vec<FieldViolation>) {
    let Some(email) = email.filter(|_| !is_blank(email)) else {
        violations.push(FieldViolation::new("email", "Email is required"));
        return;
    };

    if !email.validate_email() {
        violations.push(FieldViolation::new("email", "Email must be valid"));
    }
    if char_len(email) > MAX_EMAIL_LENGTH {
        violations.push(FieldViolation::new(
            "email",
            format!("Email must not exceed {} characters", MAX_EMAIL_LENGTH),
        ));
    }
}

fn validate_password(password: Option<&str>, violations: &mut Vec<FieldViolation>) {
    let Some(password) = password.filter(|_| !is_blank(password)) else {
        violations.push(FieldViolation::new("password", "Password is required"));
        return;
    };

    let len = char_len(password);
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        violations.push(FieldViolation::new(
            "password",
            format!(
                "Password must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            ),
        ));
    }

    let classes: [(fn(&char) -> bool, &str); 4] = [
        (char::is_ascii_digit, "Password must contain at least one digit"),
        (|c| c.is_uppercase(), "Password must contain at least one uppercase letter"),
        (|c| c.is_lowercase(), "Password must contain at least one lowercase letter"),
        (
            |c| !c.is_alphanumeric() && !c.is_whitespace(),
            "Password must contain at least one special character",
        ),
    ];

    for (matches, message) in classes {
        if !password.chars().any(|c| matches(&c)) {
            violations.push(FieldViolation::new("password", message));
        }
    }
}

fn validate_max_length(
    field: &str,
    label: &str,
    value: Option<&str>,
    violations: &mut Vec<FieldViolation>,
) {
    if value.map_or(false, |v| char_len(v) > MAX_NAME_LENGTH) {
        violations.push(FieldViolation::new(
            field,
            format!("{} must not exceed {} characters", label, MAX_NAME_LENGTH),
        ));
    }
}
