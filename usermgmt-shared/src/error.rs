/// Domain errors for user operations
///
/// Every service call returns either a complete result or one of these
/// variants. The HTTP layer maps each variant to a status code.

use crate::models::user::UserId;
use validator::ValidationErrors;

/// Result alias used by the repository and service layers
pub type UserResult<T> = Result<T, UserError>;

/// Error type for user operations
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Input failed a validation rule
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Another live user already owns this email
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// No live user with this id
    #[error("User {0} not found")]
    NotFound(UserId),

    /// Unexpected persistence failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl UserError {
    /// Returns true for the not-found variant
    pub fn is_not_found(&self) -> bool {
        matches!(self, UserError::NotFound(_))
    }
}
