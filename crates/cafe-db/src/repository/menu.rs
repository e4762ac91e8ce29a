//! # Menu Repository
//!
//! Database operations for menu categories and menu items.
//!
//! ## Key Operations
//! - Category CRUD
//! - Menu item CRUD, listing by category
//! - Stock decrement when an order is paid
//!
//! ```text
//! categories ◄──── menu_items.category_id (ON DELETE SET NULL)
//!                        │
//!                        └──► order_items.menu_item_id (snapshot copied)
//! ```
//!
//! Deleting a category leaves its items uncategorised; deleting a menu
//! item leaves past order lines intact with their frozen name and price.

use cafe_core::gst::DEFAULT_GST_RATE;
use cafe_core::validation::{
    validate_item_name, validate_name, validate_price_paise, validate_tax_rate_bps,
};
use cafe_core::{Category, MenuItem};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

const MENU_ITEM_COLUMNS: &str = "id, name, description, price_paise, category_id, tax_rate_bps, \
                                 available, image_url, stock_quantity";

// =============================================================================
// Inputs
// =============================================================================

/// Body of a category create or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of a menu item create or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_paise: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Defaults to the 5% restaurant rate.
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock_quantity: i64,
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_GST_RATE.bps()
}

fn default_available() -> bool {
    true
}

impl NewMenuItem {
    pub fn validate(&self) -> DbResult<()> {
        validate_item_name(&self.name)?;
        validate_price_paise(self.price_paise)?;
        validate_tax_rate_bps(self.tax_rate_bps)?;
        Ok(())
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the menu: categories and the items in them.
///
/// ## Usage
/// ```rust,ignore
/// let repo = MenuRepository::new(pool);
///
/// let drinks = repo.items_by_category(2).await?;
/// let latte = repo.get_item(5).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get_category(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Creates a category. Names are unique.
    pub async fn create_category(&self, new: &NewCategory) -> DbResult<Category> {
        validate_name("name", &new.name)?;
        debug!(name = %new.name, "Creating category");

        let result = sqlx::query("INSERT INTO categories (name, description) VALUES (?1, ?2)")
            .bind(new.name.trim())
            .bind(&new.description)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { field, .. } => DbError::duplicate(field, new.name.trim()),
                other => other,
            })?;

        let id = result.last_insert_rowid();
        self.get_category(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id.to_string()))
    }

    pub async fn update_category(&self, id: i64, update: &NewCategory) -> DbResult<Category> {
        validate_name("name", &update.name)?;

        let result = sqlx::query("UPDATE categories SET name = ?2, description = ?3 WHERE id = ?1")
            .bind(id)
            .bind(update.name.trim())
            .bind(&update.description)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id.to_string()));
        }

        self.get_category(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id.to_string()))
    }

    pub async fn delete_category(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id.to_string()));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Menu Items
    // -------------------------------------------------------------------------

    /// Every menu item, available or not, sorted by name.
    pub async fn list_items(&self) -> DbResult<Vec<MenuItem>> {
        let sql = format!("SELECT {} FROM menu_items ORDER BY name", MENU_ITEM_COLUMNS);
        let items = sqlx::query_as::<_, MenuItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    pub async fn items_by_category(&self, category_id: i64) -> DbResult<Vec<MenuItem>> {
        debug!(category_id, "Listing menu items for category");

        let sql = format!(
            "SELECT {} FROM menu_items WHERE category_id = ?1 ORDER BY name",
            MENU_ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, MenuItem>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    pub async fn get_item(&self, id: i64) -> DbResult<Option<MenuItem>> {
        let sql = format!("SELECT {} FROM menu_items WHERE id = ?1", MENU_ITEM_COLUMNS);
        let item = sqlx::query_as::<_, MenuItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    pub async fn create_item(&self, new: &NewMenuItem) -> DbResult<MenuItem> {
        new.validate()?;
        debug!(name = %new.name, price_paise = new.price_paise, "Creating menu item");

        let result = sqlx::query(
            r#"
            INSERT INTO menu_items (
                name, description, price_paise, category_id, tax_rate_bps,
                available, image_url, stock_quantity
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(new.name.trim())
        .bind(&new.description)
        .bind(new.price_paise)
        .bind(new.category_id)
        .bind(new.tax_rate_bps)
        .bind(new.available)
        .bind(&new.image_url)
        .bind(new.stock_quantity)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_item(id)
            .await?
            .ok_or_else(|| DbError::not_found("Menu item", id.to_string()))
    }

    /// Replaces a menu item. Lines already on orders keep their snapshot.
    pub async fn update_item(&self, id: i64, update: &NewMenuItem) -> DbResult<MenuItem> {
        update.validate()?;
        debug!(id, "Updating menu item");

        let result = sqlx::query(
            r#"
            UPDATE menu_items SET
                name = ?2,
                description = ?3,
                price_paise = ?4,
                category_id = ?5,
                tax_rate_bps = ?6,
                available = ?7,
                image_url = ?8,
                stock_quantity = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(update.name.trim())
        .bind(&update.description)
        .bind(update.price_paise)
        .bind(update.category_id)
        .bind(update.tax_rate_bps)
        .bind(update.available)
        .bind(&update.image_url)
        .bind(update.stock_quantity)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu item", id.to_string()));
        }

        self.get_item(id)
            .await?
            .ok_or_else(|| DbError::not_found("Menu item", id.to_string()))
    }

    pub async fn delete_item(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting menu item");

        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu item", id.to_string()));
        }

        Ok(())
    }

    /// Takes `quantity` units out of stock, never going below zero.
    pub async fn decrement_stock(&self, id: i64, quantity: i64) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;

        if take_stock(&mut conn, id, quantity).await? == 0 {
            return Err(DbError::not_found("Menu item", id.to_string()));
        }

        Ok(())
    }
}

/// Stock decrement shared with order finalization, which runs it inside its
/// own transaction. Returns the number of rows touched.
pub(crate) async fn take_stock(
    conn: &mut SqliteConnection,
    id: i64,
    quantity: i64,
) -> DbResult<u64> {
    let result = sqlx::query(
        "UPDATE menu_items SET stock_quantity = MAX(stock_quantity - ?2, 0) WHERE id = ?1",
    )
    .bind(id)
    .bind(quantity)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

// =============================================================================
// Unit Tests
// =============================================================================
