//! Repositories for user store operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{NewUser, User};

#[cfg(test)]
pub mod memory;
pub mod user;

pub use user::UserRepository;

/// Single-document operations on the user collection.
///
/// Every handler issues at most one of these calls per request.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, returning the id assigned by the store
    async fn insert(&self, user: NewUser) -> DatabaseResult<Uuid>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;

    /// Oldest user registered with `email`, preferring users that have a
    /// password hash
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Set the name and update timestamp and bump the version.
    ///
    /// Returns the number of matched documents.
    async fn update_name(
        &self,
        id: Uuid,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<u64>;

    /// Returns the number of deleted documents
    async fn delete(&self, id: Uuid) -> DatabaseResult<u64>;

    /// Every user, oldest first
    async fn list(&self) -> DatabaseResult<Vec<User>>;
}
