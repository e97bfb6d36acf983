/// User CRUD endpoints
///
/// # Endpoints
///
/// - `GET /api/users` - List users
/// - `GET /api/users/:id` - Get user
/// - `POST /api/users` - Create user
/// - `PUT /api/users/:id` - Replace user fields
/// - `DELETE /api/users/:id` - Delete user (soft or hard, per configuration)
///
/// Bodies use the camelCase user shape:
///
/// ```json
/// {
///   "id": 1,
///   "firstName": "Ada",
///   "lastName": "Lovelace",
///   "email": "ada@example.com",
///   "active": true,
///   "createdAt": "2025-01-03T12:00:00Z",
///   "updatedAt": "2025-01-03T12:00:00Z",
///   "deletedAt": null
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use usermgmt_shared::models::user::{User, UserId, UserPayload};
use validator::Validate;

/// Delete user response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub message: String,
}

/// Parses a path id as a non-negative integer made of ASCII digits only
fn parse_user_id(raw: &str) -> ApiResult<UserId> {
    let invalid = || ApiError::BadRequest("Invalid ID format".to_string());

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    raw.parse::<u64>()
        .ok()
        .and_then(|id| UserId::try_from(id).ok())
        .ok_or_else(invalid)
}

/// Unwraps the JSON body and runs the declarative field rules
fn validated(payload: Result<Json<UserPayload>, JsonRejection>) -> ApiResult<UserPayload> {
    let Json(payload) = payload?;
    payload.validate()?;
    Ok(payload)
}

/// List users
///
/// # Errors
///
/// - `500 Internal Server Error`: Storage failure
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = state.users.get_all_users().await?;
    Ok(Json(users))
}

/// Get a user by id
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `404 Not Found`: No such user
/// - `500 Internal Server Error`: Storage failure
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let id = parse_user_id(&id)?;
    let user = state.users.get_user_by_id(id).await?;
    Ok(Json(user))
}

/// Create a user
///
/// ```text
/// POST /api/users
/// Content-Type: application/json
///
/// { "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com" }
/// ```
///
/// Responds `201 Created` with the stored user.
///
/// # Errors
///
/// - `400 Bad Request`: Body is not a user object
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Storage failure
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let payload = validated(payload)?;
    tracing::debug!(email = %payload.email, "Create user request");

    let user = state.users.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Overwrite a user's first name, last name, email and (if given) active flag
///
/// The path id is authoritative; an `id` in the body is ignored.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id or body
/// - `404 Not Found`: No such user
/// - `409 Conflict`: Email belongs to another user
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Storage failure
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let id = parse_user_id(&id)?;
    let payload = validated(payload)?;

    let user = state.users.update_user(id, payload).await?;
    Ok(Json(user))
}

/// Delete a user
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `404 Not Found`: No such user
/// - `500 Internal Server Error`: Storage failure
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteUserResponse>> {
    let id = parse_user_id(&id)?;
    state.users.delete_user(id).await?;

    Ok(Json(DeleteUserResponse {
        message: "User deleted successfully".to_string(),
    }))
}
