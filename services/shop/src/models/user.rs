//! User model and request/response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User document as stored in the user collection
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string, never serialized
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub age: i32,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Document handed to the store on insert; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /register`
#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "Password")]
    pub password: String,
}

/// Body of `POST /login`
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "Password")]
    pub password: String,
}

/// Body of `POST /createUser`
#[derive(Deserialize)]
pub struct CreateUserRequest {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(default, alias = "Password")]
    pub password: Option<String>,
    #[serde(default, alias = "Age")]
    pub age: Option<i32>,
}

/// Body of `POST /updateUser`
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(alias = "Name")]
    pub name: String,
}

/// `?id=` query of the single-user endpoints
#[derive(Debug)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    /// Best-effort parse of the user id.
    ///
    /// A missing or malformed id yields `None`, which callers treat as an id
    /// that matches no document.
    pub fn user_id(&self) -> Option<Uuid> {
        self.id.as_deref().and_then(|raw| Uuid::parse_str(raw).ok())
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    #[serde(rename = "userID")]
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Insert acknowledgment returned by `POST /createUser`
#[derive(Debug, Serialize)]
pub struct InsertAck {
    #[serde(rename = "InsertedID")]
    pub inserted_id: Uuid,
}
