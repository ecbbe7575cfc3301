use super::habit::{Habit, HabitFilter, NewHabit};
use super::user::User;
use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

/// Abstraction for habit and user persistence.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    // ---
    /// List habits selected by `filter`, ordered by [`Habit::list_order`].
    async fn list_habits(&self, filter: &HabitFilter) -> Result<Vec<Habit>>;

    /// Get a habit by ID.
    async fn get_habit(&self, id: Uuid) -> Result<Option<Habit>>;

    /// Insert a new habit and return it with its generated ID.
    async fn create_habit(&self, fields: NewHabit) -> Result<Habit>;

    /// Overwrite the mutable fields of an existing habit.
    ///
    /// Returns `None` if no habit has the given ID.
    async fn update_habit(&self, id: Uuid, fields: NewHabit) -> Result<Option<Habit>>;

    /// Delete a habit. Returns `false` if it did not exist.
    async fn delete_habit(&self, id: Uuid) -> Result<bool>;

    /// Create a new user with an already-hashed password.
    ///
    /// Fails if the username is taken or violates the username rules.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User>;

    /// Get user by username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<()>;
}

/// Type alias for any backend that implements Repository.
pub type RepositoryPtr = Arc<dyn Repository>;
