//! # Inventory Repository
//!
//! Stock-room ingredients (milk, beans, cups) with a reorder point.
//!
//! ```text
//! quantity ─────────────┐
//!                       ├──► quantity <= alert_threshold ──► low stock
//! alert_threshold ──────┘    (NULL threshold never alerts)
//! ```

use cafe_core::validation::{validate_name, validate_search_query, validate_stock_level};
use cafe_core::InventoryItem;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Body of an inventory create or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub alert_threshold: Option<f64>,
    #[serde(default)]
    pub cost_paise: Option<i64>,
}

impl NewInventoryItem {
    pub fn validate(&self) -> DbResult<()> {
        validate_name("name", &self.name)?;
        validate_name("unit", &self.unit)?;
        validate_stock_level("quantity", self.quantity)?;
        if let Some(threshold) = self.alert_threshold {
            validate_stock_level("alert_threshold", threshold)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            "SELECT id, name, quantity, unit, alert_threshold, cost_paise FROM inventory ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Case-insensitive substring match on the item name.
    ///
    /// An empty query lists everything.
    pub async fn search(&self, query: &str) -> DbResult<Vec<InventoryItem>> {
        let query = validate_search_query(query)?;
        if query.is_empty() {
            return self.list().await;
        }

        debug!(query = %query, "Searching inventory");

        let pattern = format!("%{}%", query.to_lowercase());
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, name, quantity, unit, alert_threshold, cost_paise
            FROM inventory
            WHERE LOWER(name) LIKE ?1
            ORDER BY name
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Items at or below their reorder point, emptiest first.
    pub async fn low_stock(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, name, quantity, unit, alert_threshold, cost_paise
            FROM inventory
            WHERE alert_threshold IS NOT NULL AND quantity <= alert_threshold
            ORDER BY quantity, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Low stock items");
        Ok(items)
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(
            "SELECT id, name, quantity, unit, alert_threshold, cost_paise FROM inventory WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn create(&self, new: &NewInventoryItem) -> DbResult<InventoryItem> {
        new.validate()?;
        debug!(name = %new.name, "Creating inventory item");

        let result = sqlx::query(
            r#"
            INSERT INTO inventory (name, quantity, unit, alert_threshold, cost_paise)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(new.name.trim())
        .bind(new.quantity)
        .bind(new.unit.trim())
        .bind(new.alert_threshold)
        .bind(new.cost_paise)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Inventory item", id.to_string()))
    }

    pub async fn update(&self, id: i64, update: &NewInventoryItem) -> DbResult<InventoryItem> {
        update.validate()?;

        let result = sqlx::query(
            r#"
            UPDATE inventory SET
                name = ?2,
                quantity = ?3,
                unit = ?4,
                alert_threshold = ?5,
                cost_paise = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(update.name.trim())
        .bind(update.quantity)
        .bind(update.unit.trim())
        .bind(update.alert_threshold)
        .bind(update.cost_paise)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id.to_string()));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Inventory item", id.to_string()))
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id.to_string()));
        }

        Ok(())
    }
}
