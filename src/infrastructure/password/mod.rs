//! Password hashing.
//!
//! Thin wrappers over `bcrypt`. Hashing is CPU-bound, so both operations run
//! on Tokio's blocking thread pool instead of a request worker.

use anyhow::{Context, Result};

/// Hashes a plaintext password with the given bcrypt work factor.
///
/// # Errors
/// Returns an error if the cost is out of range or the blocking task fails.
pub async fn hash_password(password: String, cost: u32) -> Result<String> {
    // ---
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task failed")?
        .context("failed to hash password")
}

/// Checks a plaintext password against a stored bcrypt hash.
///
/// # Errors
/// Returns an error if the stored hash is malformed.
pub async fn verify_password(password: String, hash: String) -> Result<bool> {
    // ---
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task failed")?
        .context("failed to verify password")
}
