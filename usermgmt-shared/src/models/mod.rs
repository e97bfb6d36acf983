/// Data models for the user-management service
///
/// # Models
///
/// - `user`: the `User` record, request payload and validation policy
///
/// # Example
///
/// ```
/// use usermgmt_shared::models::user::{NameLengthPolicy, UserPayload};
///
/// let payload = UserPayload {
///     first_name: "Ada".to_string(),
///     last_name: "Lovelace".to_string(),
///     email: "ada@example.com".to_string(),
///     active: None,
/// };
///
/// assert!(NameLengthPolicy::default().validate(&payload).is_ok());
/// ```

pub mod user;
