//! # Settings Repository
//!
//! Key/value settings: cafe name, address, GSTIN, receipt footer.
//!
//! Receipts and reports read these through [`SettingsRepository::settings_map`]
//! and resolve them with [`CafeInfo::from_lookup`](cafe_core::CafeInfo::from_lookup),
//! which falls back to built-in defaults when the lookup fails.

use std::collections::HashMap;

use cafe_core::validation::validate_setting_key;
use cafe_core::Setting;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Body of a settings upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSetting {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default = "default_value_type")]
    pub value_type: String,
}

fn default_value_type() -> String {
    "string".to_string()
}

impl NewSetting {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        NewSetting {
            key: key.into(),
            value: Some(value.into()),
            value_type: default_value_type(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<Setting>> {
        let settings = sqlx::query_as::<_, Setting>(
            "SELECT id, key, value, value_type FROM settings ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    pub async fn get(&self, key: &str) -> DbResult<Option<Setting>> {
        let setting = sqlx::query_as::<_, Setting>(
            "SELECT id, key, value, value_type FROM settings WHERE key = ?1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    /// Inserts the key or overwrites its value.
    pub async fn upsert(&self, setting: &NewSetting) -> DbResult<Setting> {
        validate_setting_key(&setting.key)?;
        debug!(key = %setting.key, "Saving setting");

        sqlx::query(
            r#"
            INSERT INTO settings (key, value, value_type) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                value_type = excluded.value_type
            "#,
        )
        .bind(&setting.key)
        .bind(&setting.value)
        .bind(&setting.value_type)
        .execute(&self.pool)
        .await?;

        self.get(&setting.key)
            .await?
            .ok_or_else(|| DbError::not_found("Setting", setting.key.clone()))
    }

    /// Every setting that has a value, keyed by name.
    pub async fn settings_map(&self) -> DbResult<HashMap<String, String>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT key, value FROM settings WHERE value IS NOT NULL")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().collect())
    }
}
