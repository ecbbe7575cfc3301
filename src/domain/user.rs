use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum accepted username length, in characters.
pub const MIN_USERNAME_LEN: usize = 8;

/// Represents a registered user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    // ---
    pub id: Uuid,
    pub username: String,

    /// bcrypt hash of the user's password. Never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

impl User {
    // ---
    pub fn new(username: String, password_hash: String) -> Self {
        // ---
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Checks the username rules enforced by every user store.
pub fn validate_username(username: &str) -> Result<(), String> {
    // ---
    if username.trim().is_empty() {
        return Err("username is required".to_string());
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(format!(
            "username must be at least {MIN_USERNAME_LEN} characters"
        ));
    }
    Ok(())
}

/// Validates registration input before anything is hashed or stored.
///
/// # Errors
/// Returns a client-facing message describing the first failed rule.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), String> {
    // ---
    validate_username(username)?;
    if password.is_empty() {
        return Err("password is required".to_string());
    }
    Ok(())
}
