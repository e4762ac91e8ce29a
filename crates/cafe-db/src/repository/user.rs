//! # User Repository
//!
//! Staff records. Shifts, orders and expenses reference a user by id, so
//! users are deactivated rather than deleted.

use cafe_core::validation::{validate_name, validate_username};
use cafe_core::{User, UserRole};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const USER_COLUMNS: &str = "id, name, username, role, active, created_at";

/// Body of a user create or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl NewUser {
    pub fn new(name: impl Into<String>, username: impl Into<String>, role: UserRole) -> Self {
        NewUser {
            name: name.into(),
            username: username.into(),
            role,
            active: true,
        }
    }

    pub fn validate(&self) -> DbResult<()> {
        validate_name("name", &self.name)?;
        validate_username(self.username.trim())?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY name, id",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ?1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn create(&self, new: &NewUser) -> DbResult<User> {
        new.validate()?;
        let username = new.username.trim();
        debug!(username, role = %new.role, "Creating user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, username, role, active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(new.name.trim())
        .bind(username)
        .bind(new.role)
        .bind(new.active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("username", username),
            other => other,
        })?;

        let id = result.last_insert_rowid();
        info!(user_id = id, username, "User created");

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id.to_string()))
    }

    /// Replaces name, username, role and the active flag.
    pub async fn update(&self, id: i64, update: &NewUser) -> DbResult<User> {
        update.validate()?;
        let username = update.username.trim();

        let result = sqlx::query(
            "UPDATE users SET name = ?2, username = ?3, role = ?4, active = ?5 WHERE id = ?1",
        )
        .bind(id)
        .bind(update.name.trim())
        .bind(username)
        .bind(update.role)
        .bind(update.active)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("username", username),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id.to_string()));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id.to_string()))
    }
}
