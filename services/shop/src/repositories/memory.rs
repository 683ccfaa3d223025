//! In-memory user store for handler tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::UserStore;
use crate::models::{NewUser, User};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    unique_emails: bool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Behave as if a unique index existed on `email`
    pub fn with_unique_emails() -> Self {
        Self {
            unique_emails: true,
            ..Self::default()
        }
    }

    /// Raw stored documents, password hashes included
    pub async fn documents(&self) -> Vec<User> {
        self.users.lock().await.clone()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: NewUser) -> DatabaseResult<Uuid> {
        let mut users = self.users.lock().await;
        if self.unique_emails && users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict(format!(
                "duplicate email {}",
                user.email
            )));
        }

        let id = Uuid::new_v4();
        users.push(User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            age: user.age,
            version: 1,
            created_at: user.created_at,
            updated_at: user.updated_at,
        });
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.lock().await;
        let mut matching = users.iter().filter(|u| u.email == email);
        let with_password = matching.clone().find(|u| u.password_hash.is_some());
        Ok(with_password.or_else(|| matching.next()).cloned())
    }

    async fn update_name(
        &self,
        id: Uuid,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<u64> {
        let mut users = self.users.lock().await;
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.name = name.to_string();
                user.updated_at = updated_at;
                user.version += 1;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<u64> {
        let mut users = self.users.lock().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok((before - users.len()) as u64)
    }

    async fn list(&self) -> DatabaseResult<Vec<User>> {
        Ok(self.users.lock().await.clone())
    }
}
