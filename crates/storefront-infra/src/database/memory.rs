//! In-memory user repository.
//!
//! Backs the server when `DATABASE_URL` is not configured, and keeps handler
//! tests free of a running Postgres.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use storefront_core::domain::User;
use storefront_core::error::RepoError;
use storefront_core::ports::UserRepository;

/// HashMap-backed repository with the same constraint behavior as Postgres.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self
            .users
            .read()
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self
            .users
            .read()
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self
            .users
            .write()
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        // Mirror the unique index on email.
        if users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut users = self
            .users
            .write()
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        users.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}
