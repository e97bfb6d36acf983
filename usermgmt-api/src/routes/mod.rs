/// API route handlers
///
/// - `health`: Health check endpoint
/// - `users`: User CRUD endpoints under `/api/users`

pub mod health;
pub mod users;
