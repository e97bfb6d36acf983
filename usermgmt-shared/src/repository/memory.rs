use super::UserRepository;
use crate::error::{UserError, UserResult};
use crate::models::user::{CreateUser, UpdateUser, User, UserId};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// Process-local user repository
///
/// Mirrors the PostgreSQL adapter: ids start at 1 and are never reused,
/// soft-deleted rows stay in the map but are invisible to reads, and emails
/// are unique among live rows.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    state: Mutex<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    next_id: UserId,
    users: BTreeMap<UserId, User>,
}

impl MemoryState {
    fn live(&self, id: UserId) -> Option<&User> {
        self.users.get(&id).filter(|u| u.deleted_at.is_none())
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users.values().any(|u| {
            u.deleted_at.is_none() && u.email == email && Some(u.id) != except
        })
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: 1,
                users: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored rows, soft-deleted ones included
    pub async fn row_count(&self) -> usize {
        self.state.lock().await.users.len()
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, data: CreateUser) -> UserResult<User> {
        let mut state = self.state.lock().await;
        if state.email_taken(&data.email, None) {
            return Err(UserError::DuplicateEmail(data.email));
        }

        let id = state.next_id;
        state.next_id += 1;

        let now = Utc::now();
        let user = User {
            id,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            active: data.active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> UserResult<Option<User>> {
        Ok(self.state.lock().await.live(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.deleted_at.is_none() && u.email == email)
            .cloned())
    }

    async fn update(&self, id: UserId, data: UpdateUser) -> UserResult<Option<User>> {
        let mut state = self.state.lock().await;
        if state.live(id).is_none() {
            return Ok(None);
        }
        if state.email_taken(&data.email, Some(id)) {
            return Err(UserError::DuplicateEmail(data.email));
        }

        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        user.first_name = data.first_name;
        user.last_name = data.last_name;
        user.email = data.email;
        if let Some(active) = data.active {
            user.active = active;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn soft_delete(&self, id: UserId) -> UserResult<u64> {
        let mut state = self.state.lock().await;
        match state.users.get_mut(&id) {
            Some(user) if user.deleted_at.is_none() => {
                let now = Utc::now();
                user.deleted_at = Some(now);
                user.updated_at = now;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn hard_delete(&self, id: UserId) -> UserResult<u64> {
        let mut state = self.state.lock().await;
        if state.live(id).is_none() {
            return Ok(0);
        }
        state.users.remove(&id);
        Ok(1)
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .filter(|u| u.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn ping(&self) -> UserResult<()> {
        Ok(())
    }
}
