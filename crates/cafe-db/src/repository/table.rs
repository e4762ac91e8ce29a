//! # Dining Table Repository
//!
//! Tables on the floor and whether someone is sitting at them. The
//! occupied flag is also flipped by the order repository: the first line
//! on a table's order seats it, and paying or cancelling frees it.

use cafe_core::validation::{validate_capacity, validate_name};
use cafe_core::DiningTable;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Body of a table create or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTable {
    pub name: String,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub occupied: bool,
}

impl NewTable {
    pub fn validate(&self) -> DbResult<()> {
        validate_name("name", &self.name)?;
        if let Some(capacity) = self.capacity {
            validate_capacity(capacity)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TableRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<DiningTable>> {
        let tables = sqlx::query_as::<_, DiningTable>(
            "SELECT id, name, capacity, occupied FROM dining_tables ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<DiningTable>> {
        let table = sqlx::query_as::<_, DiningTable>(
            "SELECT id, name, capacity, occupied FROM dining_tables WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(table)
    }

    pub async fn create(&self, new: &NewTable) -> DbResult<DiningTable> {
        new.validate()?;
        debug!(name = %new.name, "Creating dining table");

        let result = sqlx::query(
            "INSERT INTO dining_tables (name, capacity, occupied) VALUES (?1, ?2, ?3)",
        )
        .bind(new.name.trim())
        .bind(new.capacity)
        .bind(new.occupied)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, new.name.trim()),
            other => other,
        })?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Table", id.to_string()))
    }

    pub async fn update(&self, id: i64, update: &NewTable) -> DbResult<DiningTable> {
        update.validate()?;

        let result = sqlx::query(
            "UPDATE dining_tables SET name = ?2, capacity = ?3, occupied = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(update.name.trim())
        .bind(update.capacity)
        .bind(update.occupied)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", id.to_string()));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Table", id.to_string()))
    }

    /// Deletes a table. Orders that were placed at it keep their history
    /// with `table_id` cleared.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM dining_tables WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", id.to_string()));
        }

        Ok(())
    }

    pub async fn set_occupied(&self, id: i64, occupied: bool) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;

        if mark_occupied(&mut conn, id, occupied).await? == 0 {
            return Err(DbError::not_found("Table", id.to_string()));
        }

        Ok(())
    }
}

/// Flips the occupied flag; shared with the order repository's
/// transactions. Returns the number of rows touched.
pub(crate) async fn mark_occupied(
    conn: &mut SqliteConnection,
    id: i64,
    occupied: bool,
) -> DbResult<u64> {
    debug!(table_id = id, occupied, "Updating table occupancy");

    let result = sqlx::query("UPDATE dining_tables SET occupied = ?2 WHERE id = ?1")
        .bind(id)
        .bind(occupied)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}
