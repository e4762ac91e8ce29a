//! # Database Handle
//!
//! Opens the cafe's SQLite file and hands out repositories.
//!
//! ```text
//! DbConfig::new("./data/cafe.db")         DbConfig::in_memory()
//!        │                                        │
//!        ▼                                        ▼
//! create ./data/ if missing               single pinned connection
//! WAL journal, busy timeout               (the database lives only as
//! foreign_keys = ON                        long as that connection)
//!        │                                        │
//!        └──────────────┬─────────────────────────┘
//!                       ▼
//!              embedded migrations
//!                       │
//!                       ▼
//!   db.menu()  db.orders()  db.users()  db.shifts()  ...
//! ```
//!
//! Shifts, orders and expenses reference `users`, order lines reference
//! orders and menu items, so every connection is opened with foreign keys
//! enforced and [`Database::new`] refuses a connection where they are off.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::expense::ExpenseRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::menu::MenuRepository;
use crate::repository::order::OrderRepository;
use crate::repository::settings::SettingsRepository;
use crate::repository::shift::ShiftRepository;
use crate::repository::table::TableRepository;
use crate::repository::user::UserRepository;

/// How long a till waits on another till's write lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    File(PathBuf),
    Memory,
}

/// Where the database lives and how large the pool may grow.
#[derive(Debug, Clone)]
pub struct DbConfig {
    location: Location,
    max_connections: u32,
    migrate: bool,
}

impl DbConfig {
    /// A database file, created along with its parent directory if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: Location::File(path.into()),
            max_connections: 5,
            migrate: true,
        }
    }

    /// A private database for tests and demos.
    pub fn in_memory() -> Self {
        DbConfig {
            location: Location::Memory,
            max_connections: 1,
            migrate: true,
        }
    }

    /// Upper bound on pooled connections. Ignored in memory, where a second
    /// connection would see a different, empty database.
    pub fn max_connections(mut self, max: u32) -> Self {
        if self.location != Location::Memory {
            self.max_connections = max.max(1);
        }
        self
    }

    /// Opens the schema as found, without applying migrations.
    pub fn without_migrations(mut self) -> Self {
        self.migrate = false;
        self
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = SqliteConnectOptions::new()
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        Ok(match &self.location {
            Location::Memory => options.in_memory(true),
            Location::File(path) => {
                ensure_parent_dir(path)?;
                options
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal)
            }
        })
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new().max_connections(self.max_connections);

        match self.location {
            // Dropping the only connection would drop the database with it.
            Location::Memory => options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            Location::File(_) => options.idle_timeout(Some(Duration::from_secs(600))),
        }
    }
}

fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            debug!(dir = %dir.display(), "Creating database directory");
            std::fs::create_dir_all(dir).map_err(|e| {
                DbError::ConnectionFailed(format!("cannot create {}: {}", dir.display(), e))
            })
        }
        _ => Ok(()),
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared handle over the pool. Clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects, checks foreign key enforcement and applies pending
    /// migrations unless [`DbConfig::without_migrations`] was set.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        match &config.location {
            Location::File(path) => info!(path = %path.display(), "Opening cafe database"),
            Location::Memory => info!("Opening in-memory cafe database"),
        }

        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let foreign_keys: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await?;
        if foreign_keys != 1 {
            return Err(DbError::ConnectionFailed(
                "SQLite foreign key enforcement is unavailable".to_string(),
            ));
        }

        let db = Database { pool };
        if config.migrate {
            migrations::run_migrations(&db.pool).await?;
        }

        info!(max_connections = config.max_connections, "Database ready");
        Ok(db)
    }

    /// Raw pool, for diagnostics such as [`migrations::migration_status`].
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn menu(&self) -> MenuRepository {
        MenuRepository::new(self.pool.clone())
    }

    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.pool.clone())
    }

    pub fn tables(&self) -> TableRepository {
        TableRepository::new(self.pool.clone())
    }

    /// Orders with their lines; finalization runs in one transaction.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn shifts(&self) -> ShiftRepository {
        ShiftRepository::new(self.pool.clone())
    }

    pub fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new(self.pool.clone())
    }

    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.pool.clone())
    }

    /// True while the pool can still answer a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }

    /// Waits for checked-out connections and closes the pool.
    pub async fn close(&self) {
        info!("Closing cafe database");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        assert!(db.users().list().await.unwrap().is_empty());
        assert!(db.menu().list_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = sqlx::query("INSERT INTO employee_shifts (user_id, clock_in) VALUES (?1, ?2)")
            .bind(404_i64)
            .bind(chrono::Utc::now())
            .execute(db.pool())
            .await
            .map_err(DbError::from)
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[test]
    fn test_in_memory_ignores_pool_size() {
        let config = DbConfig::in_memory().max_connections(8);
        assert_eq!(config.max_connections, 1);

        let config = DbConfig::new("cafe.db").max_connections(0);
        assert_eq!(config.max_connections, 1);
    }

    #[tokio::test]
    async fn test_file_database_creates_directory_and_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("cafe.db");

        let db = Database::new(DbConfig::new(&path).max_connections(2))
            .await
            .unwrap();
        assert!(path.exists());

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(mode, "wal");

        db.close().await;
        assert!(!db.health_check().await);
    }
}
