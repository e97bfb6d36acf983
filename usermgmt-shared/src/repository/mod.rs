/// Storage port for users
///
/// The service layer only sees [`UserRepository`]. Two adapters implement it:
///
/// - `postgres`: the production adapter backed by a sqlx `PgPool`
/// - `memory`: a process-local adapter for tests and local experiments
///
/// Every read ignores soft-deleted rows. Both delete methods report the
/// number of affected rows so callers can tell a missing id from a success.

use crate::error::UserResult;
use crate::models::user::{CreateUser, UpdateUser, User, UserId};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

/// Persistence operations on the `users` table
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user and returns the stored record
    ///
    /// Fails with `DuplicateEmail` when a live user already has the email.
    async fn insert(&self, data: CreateUser) -> UserResult<User>;

    /// Finds a live user by id
    async fn find_by_id(&self, id: UserId) -> UserResult<Option<User>>;

    /// Finds a live user by exact email
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Overwrites the mutable fields of a live user and refreshes `updated_at`
    ///
    /// Returns `None` when no live user has this id.
    async fn update(&self, id: UserId, data: UpdateUser) -> UserResult<Option<User>>;

    /// Marks a live user as deleted, returning the affected row count
    async fn soft_delete(&self, id: UserId) -> UserResult<u64>;

    /// Permanently removes a live user, returning the affected row count
    async fn hard_delete(&self, id: UserId) -> UserResult<u64>;

    /// Lists all live users
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Checks that storage is reachable
    async fn ping(&self) -> UserResult<()>;
}
