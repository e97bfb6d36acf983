/// User model, request payload and name validation policy
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     first_name VARCHAR(255) NOT NULL,
///     last_name VARCHAR(255) NOT NULL,
///     email VARCHAR(320) NOT NULL,
///     active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// CREATE UNIQUE INDEX users_email_key ON users (email) WHERE deleted_at IS NULL;
/// ```
///
/// All JSON uses camelCase field names (`firstName`, `createdAt`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

/// User identifier, assigned by storage and never reused
pub type UserId = i64;

/// A stored user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Storage-assigned identifier
    pub id: UserId,

    pub first_name: String,

    pub last_name: String,

    /// Unique among users that are not soft-deleted
    pub email: String,

    /// Defaults to true on creation
    pub active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Set when the user was soft-deleted, serialized as `null` otherwise
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Request body for creating or replacing a user
///
/// Fields the client cannot set (`id`, timestamps) are ignored if present.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// `None` means "true" on create and "unchanged" on update
    #[serde(default)]
    pub active: Option<bool>,
}

/// Input for inserting a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub active: bool,
}

/// Input for overwriting the mutable fields of a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    /// Left untouched when `None`
    pub active: Option<bool>,
}

impl From<UserPayload> for CreateUser {
    fn from(payload: UserPayload) -> Self {
        Self {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            active: payload.active.unwrap_or(true),
        }
    }
}

impl From<UserPayload> for UpdateUser {
    fn from(payload: UserPayload) -> Self {
        Self {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            active: payload.active,
        }
    }
}

/// Longest name the `users` columns can hold (`VARCHAR(255)`)
pub const NAME_MAX_CHARS: usize = 255;

/// Length rule applied to `firstName` and `lastName`
///
/// Names are always required to contain a non-whitespace character and are
/// never longer than [`NAME_MAX_CHARS`]. The configurable bounds count
/// Unicode scalar values and can be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameLengthPolicy {
    /// Only presence and the storage cap are checked
    Unbounded,

    /// Inclusive character bounds
    Bounded { min: usize, max: usize },
}

impl Default for NameLengthPolicy {
    fn default() -> Self {
        NameLengthPolicy::Bounded { min: 2, max: 50 }
    }
}

impl NameLengthPolicy {
    /// Checks both name fields of `payload`
    ///
    /// Errors are keyed by the payload field names, the same way the
    /// derived `Validate` rules report them.
    pub fn validate(&self, payload: &UserPayload) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = self.check(&payload.first_name) {
            errors.add("first_name", e);
        }
        if let Err(e) = self.check(&payload.last_name) {
            errors.add("last_name", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn check(&self, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(error_with_message("required", "Name must not be blank".into()));
        }

        let (min, max) = match *self {
            NameLengthPolicy::Unbounded => (1, NAME_MAX_CHARS),
            NameLengthPolicy::Bounded { min, max } => (min, max.min(NAME_MAX_CHARS)),
        };

        let len = value.chars().count();
        if len < min || len > max {
            return Err(error_with_message(
                "length",
                format!("Name must be {}-{} characters", min, max).into(),
            ));
        }

        Ok(())
    }
}

fn error_with_message(code: &'static str, message: Cow<'static, str>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message);
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(first: &str, last: &str, email: &str) -> UserPayload {
        UserPayload {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            active: None,
        }
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let now = Utc::now();
        let user = User {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
        assert_eq!(json["active"], true);
        assert!(json["createdAt"].is_string());
        assert!(json["deletedAt"].is_null());
    }

    #[test]
    fn test_payload_ignores_unknown_fields() {
        let json = r#"{"id": 9, "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com", "createdAt": "2024-01-01T00:00:00Z"}"#;
        let parsed: UserPayload = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.first_name, "Ada");
        assert_eq!(parsed.active, None);
    }

    #[test]
    fn test_payload_email_rule() {
        assert!(payload("Ada", "Lovelace", "ada@example.com").validate().is_ok());

        let errors = payload("Ada", "Lovelace", "not-an-email").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_payload_required_names() {
        let errors = payload("", "", "ada@example.com").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("last_name"));
    }

    #[test]
    fn test_create_user_defaults_active() {
        let data = CreateUser::from(payload("Ada", "Lovelace", "ada@example.com"));
        assert!(data.active);

        let mut inactive = payload("Ada", "Lovelace", "ada@example.com");
        inactive.active = Some(false);
        assert!(!CreateUser::from(inactive).active);
    }

    #[test]
    fn test_update_user_keeps_active_unset() {
        let data = UpdateUser::from(payload("Ada", "Lovelace", "ada@example.com"));
        assert_eq!(data.active, None);
    }

    #[test]
    fn test_name_policy_bounds() {
        let policy = NameLengthPolicy::default();
        assert!(policy.validate(&payload("Al", "Turing", "al@example.com")).is_ok());

        let errors = policy.validate(&payload("A", "Turing", "a@example.com")).unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(!fields.contains_key("last_name"));

        let long = "x".repeat(51);
        assert!(policy.validate(&payload("Ada", &long, "ada@example.com")).is_err());
    }

    #[test]
    fn test_name_policy_counts_chars_not_bytes() {
        let policy = NameLengthPolicy::Bounded { min: 2, max: 3 };
        assert!(policy.validate(&payload("Çağ", "Öz", "c@example.com")).is_ok());
    }

    #[test]
    fn test_storage_cap_applies_to_every_policy() {
        let at_cap = "x".repeat(NAME_MAX_CHARS);
        let over_cap = "x".repeat(NAME_MAX_CHARS + 1);

        for policy in [
            NameLengthPolicy::Unbounded,
            NameLengthPolicy::Bounded { min: 2, max: 1000 },
        ] {
            assert!(policy.validate(&payload(&at_cap, "B", "a@example.com")).is_ok());

            let errors = policy
                .validate(&payload(&over_cap, "B", "a@example.com"))
                .unwrap_err();
            assert!(errors.field_errors().contains_key("first_name"));
        }
    }

    #[test]
    fn test_unbounded_policy_still_rejects_blank() {
        let policy = NameLengthPolicy::Unbounded;
        assert!(policy.validate(&payload("A", "B", "a@example.com")).is_ok());
        assert!(policy.validate(&payload("   ", "B", "a@example.com")).is_err());
    }
}
