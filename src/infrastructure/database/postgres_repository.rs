use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    validate_username, Habit, HabitFilter, NewHabit, Repository, RepositoryPtr, User,
};

#[derive(sqlx::FromRow)]
struct HabitRow {
    id: Uuid,
    name: String,
    category: String,
    description: Option<String>,
}

impl From<HabitRow> for Habit {
    fn from(r: HabitRow) -> Self {
        // ---
        Habit {
            id: r.id,
            name: r.name,
            category: r.category,
            description: r.description,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        // ---
        User {
            id: r.id,
            username: r.username,
            password_hash: r.password_hash,
            created_at: r.created_at,
        }
    }
}

const HABIT_COLUMNS: &str = "id, name, category, description";

/// Byte-wise name order with the id as tie-break, matching `Habit::list_order`.
const HABIT_ORDER: &str = "name COLLATE \"C\", id";

pub fn create_postgres_repository(pool: PgPool) -> RepositoryPtr {
    // ---
    Arc::new(PostgresRepository::new(pool))
}

pub struct PostgresRepository {
    // ---
    pool: PgPool,
}

impl PostgresRepository {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Repository for PostgresRepository {
    // ---
    async fn list_habits(&self, filter: &HabitFilter) -> Result<Vec<Habit>> {
        // ---
        let rows = match filter {
            HabitFilter::All => {
                sqlx::query_as::<_, HabitRow>(&format!(
                    "SELECT {HABIT_COLUMNS} FROM habits ORDER BY {HABIT_ORDER}"
                ))
                .fetch_all(&self.pool)
                .await?
            }
            HabitFilter::Category(category) => {
                sqlx::query_as::<_, HabitRow>(&format!(
                    "SELECT {HABIT_COLUMNS} FROM habits WHERE category = $1 ORDER BY {HABIT_ORDER}"
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            HabitFilter::Keyword(keyword) => {
                sqlx::query_as::<_, HabitRow>(&format!(
                    "SELECT {HABIT_COLUMNS} FROM habits
                     WHERE search @@ plainto_tsquery('simple', $1) ORDER BY {HABIT_ORDER}"
                ))
                .bind(keyword)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Habit::from).collect())
    }

    async fn get_habit(&self, id: Uuid) -> Result<Option<Habit>> {
        // ---
        let row = sqlx::query_as::<_, HabitRow>(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Habit::from))
    }

    async fn create_habit(&self, fields: NewHabit) -> Result<Habit> {
        // ---
        let habit = Habit::new(fields);

        sqlx::query("INSERT INTO habits (id, name, category, description) VALUES ($1, $2, $3, $4)")
            .bind(habit.id)
            .bind(&habit.name)
            .bind(&habit.category)
            .bind(&habit.description)
            .execute(&self.pool)
            .await?;

        Ok(habit)
    }

    async fn update_habit(&self, id: Uuid, fields: NewHabit) -> Result<Option<Habit>> {
        // ---
        let row = sqlx::query_as::<_, HabitRow>(&format!(
            "UPDATE habits SET name = $1, category = $2, description = $3
             WHERE id = $4 RETURNING {HABIT_COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(&fields.category)
        .bind(&fields.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Habit::from))
    }

    async fn delete_habit(&self, id: Uuid) -> Result<bool> {
        // ---
        let result = sqlx::query("DELETE FROM habits WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        // ---
        if let Err(msg) = validate_username(username) {
            bail!(msg);
        }

        let user = User::new(username.to_string(), password_hash.to_string());

        let inserted = sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                bail!("username '{}' is already taken", username)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn ping(&self) -> Result<()> {
        // ---
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
