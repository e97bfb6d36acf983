/// PostgreSQL user repository
///
/// Uses runtime-checked sqlx queries against the `users` table created by
/// the embedded migration. The partial unique index `users_email_key` is the
/// authoritative email uniqueness guard; its violation is reported as
/// `UserError::DuplicateEmail`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use usermgmt_shared::db::pool::{create_pool, DatabaseConfig};
/// use usermgmt_shared::repository::PgUserRepository;
/// use usermgmt_shared::service::UserService;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let service = UserService::new(Arc::new(PgUserRepository::new(pool)));
/// let users = service.get_all_users().await?;
/// # Ok(())
/// # }
/// ```

use super::UserRepository;
use crate::db::pool::health_check;
use crate::error::{UserError, UserResult};
use crate::models::user::{CreateUser, UpdateUser, User, UserId};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, active, created_at, updated_at, deleted_at";

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// User repository backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps a sqlx error, turning email unique violations into `DuplicateEmail`
fn map_write_error(err: sqlx::Error, email: &str) -> UserError {
    if let sqlx::Error::Database(db_err) = &err {
        let unique = db_err.code().as_deref() == Some(UNIQUE_VIOLATION);
        let on_email = db_err
            .constraint()
            .map(|c| c.contains("email"))
            .unwrap_or(true);
        if unique && on_email {
            return UserError::DuplicateEmail(email.to_string());
        }
    }
    storage_error(err)
}

fn storage_error(err: sqlx::Error) -> UserError {
    UserError::Storage(err.to_string())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, data: CreateUser) -> UserResult<User> {
        let query = format!(
            "INSERT INTO users (first_name, last_name, email, active) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(data.active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &data.email))
    }

    async fn find_by_id(&self, id: UserId) -> UserResult<Option<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)
    }

    async fn update(&self, id: UserId, data: UpdateUser) -> UserResult<Option<User>> {
        let query = format!(
            "UPDATE users \
             SET first_name = $2, last_name = $3, email = $4, \
                 active = COALESCE($5, active), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(data.active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &data.email))
    }

    async fn soft_delete(&self, id: UserId) -> UserResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        debug!(user_id = id, rows = result.rows_affected(), "Soft delete executed");
        Ok(result.rows_affected())
    }

    async fn hard_delete(&self, id: UserId) -> UserResult<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        debug!(user_id = id, rows = result.rows_affected(), "Hard delete executed");
        Ok(result.rows_affected())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL ORDER BY id"
        );

        sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)
    }

    async fn ping(&self) -> UserResult<()> {
        health_check(&self.pool).await.map_err(storage_error)
    }
}
