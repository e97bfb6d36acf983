/// User service
///
/// Business rules on top of a [`UserRepository`]:
///
/// - emails are unique among live users (pre-checked here, enforced by storage)
/// - names follow the configured [`NameLengthPolicy`]
/// - deletion follows the configured [`DeletePolicy`]
///
/// The service holds the single shared storage handle. It is cheap to clone
/// and is built once at process start.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use usermgmt_shared::models::user::UserPayload;
/// use usermgmt_shared::repository::InMemoryUserRepository;
/// use usermgmt_shared::service::{DeletePolicy, UserService};
///
/// # async fn example() -> Result<(), usermgmt_shared::error::UserError> {
/// let service = UserService::new(Arc::new(InMemoryUserRepository::new()))
///     .with_delete_policy(DeletePolicy::Soft);
///
/// let user = service
///     .create_user(UserPayload {
///         first_name: "Ada".to_string(),
///         last_name: "Lovelace".to_string(),
///         email: "ada@example.com".to_string(),
///         active: None,
///     })
///     .await?;
///
/// service.delete_user(user.id).await?;
/// # Ok(())
/// # }
/// ```

use crate::error::{UserError, UserResult};
use crate::models::user::{CreateUser, NameLengthPolicy, UpdateUser, User, UserId, UserPayload};
use crate::repository::UserRepository;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How `delete_user` removes a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Set `deleted_at`; the row stays but is hidden from every read
    Soft,

    /// Remove the row permanently
    #[default]
    Hard,
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soft" => Ok(DeletePolicy::Soft),
            "hard" => Ok(DeletePolicy::Hard),
            other => Err(format!("unknown delete mode '{}', expected 'soft' or 'hard'", other)),
        }
    }
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletePolicy::Soft => write!(f, "soft"),
            DeletePolicy::Hard => write!(f, "hard"),
        }
    }
}

/// User business operations
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    delete_policy: DeletePolicy,
    name_policy: NameLengthPolicy,
}

impl fmt::Debug for UserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserService")
            .field("delete_policy", &self.delete_policy)
            .field("name_policy", &self.name_policy)
            .finish_non_exhaustive()
    }
}

impl UserService {
    /// Creates a service with hard delete and the default name bounds
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self {
            repo,
            delete_policy: DeletePolicy::default(),
            name_policy: NameLengthPolicy::default(),
        }
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn with_name_policy(mut self, policy: NameLengthPolicy) -> Self {
        self.name_policy = policy;
        self
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    /// Creates a user
    ///
    /// # Errors
    ///
    /// - `Validation` if a name breaks the name policy
    /// - `DuplicateEmail` if a live user already has the email, whether caught
    ///   by the pre-check or by the storage constraint
    /// - `Storage` on any other persistence failure
    pub async fn create_user(&self, payload: UserPayload) -> UserResult<User> {
        self.name_policy.validate(&payload)?;
        debug!(email = %payload.email, "Creating user");

        if self.repo.find_by_email(&payload.email).await?.is_some() {
            warn!(email = %payload.email, "Rejected create with existing email");
            return Err(UserError::DuplicateEmail(payload.email));
        }

        let user = self.repo.insert(CreateUser::from(payload)).await?;
        info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Fetches a live user by id
    pub async fn get_user_by_id(&self, id: UserId) -> UserResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Fetches a live user by email; `Ok(None)` when nobody has it
    pub async fn get_user_by_email(&self, email: &str) -> UserResult<Option<User>> {
        self.repo.find_by_email(email).await
    }

    /// Overwrites the mutable fields of user `id`
    ///
    /// # Errors
    ///
    /// - `Validation` if a name breaks the name policy
    /// - `NotFound` if `id` is not a live user
    /// - `DuplicateEmail` if the new email belongs to another live user
    /// - `Storage` on any other persistence failure
    pub async fn update_user(&self, id: UserId, payload: UserPayload) -> UserResult<User> {
        self.name_policy.validate(&payload)?;
        debug!(user_id = id, "Updating user");

        // Unknown id wins over an email conflict
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(UserError::NotFound(id));
        }

        if let Some(owner) = self.repo.find_by_email(&payload.email).await? {
            if owner.id != id {
                warn!(user_id = id, owner_id = owner.id, "Rejected update with existing email");
                return Err(UserError::DuplicateEmail(payload.email));
            }
        }

        let user = self
            .repo
            .update(id, UpdateUser::from(payload))
            .await?
            .ok_or(UserError::NotFound(id))?;
        info!(user_id = id, "User updated");
        Ok(user)
    }

    /// Deletes user `id` according to the delete policy
    ///
    /// Absence is detected from the affected-row count.
    pub async fn delete_user(&self, id: UserId) -> UserResult<()> {
        let affected = match self.delete_policy {
            DeletePolicy::Soft => self.repo.soft_delete(id).await?,
            DeletePolicy::Hard => self.repo.hard_delete(id).await?,
        };

        if affected == 0 {
            return Err(UserError::NotFound(id));
        }

        info!(user_id = id, mode = %self.delete_policy, "User deleted");
        Ok(())
    }

    /// Lists all live users in storage order
    pub async fn get_all_users(&self) -> UserResult<Vec<User>> {
        self.repo.list().await
    }

    /// Checks that storage is reachable
    pub async fn ping(&self) -> UserResult<()> {
        self.repo.ping().await
    }
}
