//! Password hashing
//!
//! Argon2id with the crate's default cost parameters and a random salt per
//! password. Hashing and verification are CPU-bound, so the async wrappers
//! move them onto the blocking thread pool.

use std::sync::OnceLock;

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use tracing::warn;

/// Hash checked when no stored hash exists, so an unknown account costs the
/// same as a wrong password
fn placeholder_hash() -> Option<&'static str> {
    static PLACEHOLDER: OnceLock<Option<String>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| hash_password("furniture-shop-placeholder").ok())
        .as_deref()
}

/// Hash `password` into a PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Check `password` against a stored PHC string.
///
/// An unparsable stored hash never matches.
pub fn verify_password(password_hash: &str, password: &str) -> bool {
    let parsed_hash = match PasswordHash::new(password_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password hash is unreadable: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

pub async fn hash(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

pub async fn verify(password_hash: String, password: String) -> Result<bool> {
    let matched =
        tokio::task::spawn_blocking(move || verify_password(&password_hash, &password)).await?;
    Ok(matched)
}

/// Spend one verification on an account without a stored hash. Never matches.
pub async fn verify_unknown(password: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        if let Some(placeholder) = placeholder_hash() {
            verify_password(placeholder, &password);
        }
    })
    .await?;
    Ok(false)
}
