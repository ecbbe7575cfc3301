//! Process-local repository backend.
//!
//! Holds habits and users in memory behind async read/write locks. Data is
//! lost when the process exits. Used for development and tests, and as the
//! storage backend when `HABITS_STORAGE=memory`.

use anyhow::{bail, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    validate_username, Habit, HabitFilter, NewHabit, Repository, RepositoryPtr, User,
};

/// Sample habits loaded by [`create_seeded_memory_repository`].
const SAMPLE_HABITS: &[(&str, &str)] = &[
    ("Drink Water", "Health"),
    ("Track Assignment", "School"),
    ("Wash Hands", "Health"),
    ("Daily Workout", "Fitness"),
    ("Be Positive", "Wellbeing"),
    ("Eat Balanced Diet", "Health"),
    ("Wash the Dishes", "Chores"),
    ("Do Duolingo Spanish Lesson", "Learning"),
];

pub fn create_memory_repository() -> RepositoryPtr {
    // ---
    Arc::new(MemoryRepository::default())
}

/// Creates an in-memory repository pre-populated with sample habits.
pub fn create_seeded_memory_repository() -> RepositoryPtr {
    // ---
    let habits = SAMPLE_HABITS
        .iter()
        .map(|(name, category)| {
            Habit::new(NewHabit {
                name: name.to_string(),
                category: category.to_string(),
                description: None,
            })
        })
        .collect();

    Arc::new(MemoryRepository {
        habits: RwLock::new(habits),
        users: RwLock::default(),
    })
}

#[derive(Default)]
pub struct MemoryRepository {
    // ---
    habits: RwLock<Vec<Habit>>,
    users: RwLock<Vec<User>>,
}

#[async_trait::async_trait]
impl Repository for MemoryRepository {
    // ---
    async fn list_habits(&self, filter: &HabitFilter) -> Result<Vec<Habit>> {
        // ---
        let habits = self.habits.read().await;
        let mut matching: Vec<Habit> = habits.iter().filter(|h| filter.matches(h)).cloned().collect();
        matching.sort_by(Habit::list_order);
        Ok(matching)
    }

    async fn get_habit(&self, id: Uuid) -> Result<Option<Habit>> {
        // ---
        let habits = self.habits.read().await;
        Ok(habits.iter().find(|h| h.id == id).cloned())
    }

    async fn create_habit(&self, fields: NewHabit) -> Result<Habit> {
        // ---
        let habit = Habit::new(fields);
        self.habits.write().await.push(habit.clone());
        Ok(habit)
    }

    async fn update_habit(&self, id: Uuid, fields: NewHabit) -> Result<Option<Habit>> {
        // ---
        let mut habits = self.habits.write().await;
        let Some(slot) = habits.iter_mut().find(|h| h.id == id) else {
            return Ok(None);
        };

        *slot = Habit::with_id(id, fields);
        Ok(Some(slot.clone()))
    }

    async fn delete_habit(&self, id: Uuid) -> Result<bool> {
        // ---
        let mut habits = self.habits.write().await;
        let before = habits.len();
        habits.retain(|h| h.id != id);
        Ok(habits.len() < before)
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        // ---
        if let Err(msg) = validate_username(username) {
            bail!(msg);
        }

        // Uniqueness check and insert share one write lock.
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == username) {
            bail!("username '{}' is already taken", username);
        }

        let user = User::new(username.to_string(), password_hash.to_string());
        users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        // ---
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
