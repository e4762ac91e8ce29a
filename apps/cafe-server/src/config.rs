//! # Server Configuration
//!
//! Where the server listens, which database it opens, where printed
//! documents are spooled, and the cafe's local time zone.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CAFE_PORT=8080                                                     │
//! │     CAFE_DB_PATH=/var/lib/cafe/cafe.db                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path> / CAFE_CONFIG                                      │
//! │     ~/.config/cafe-pos/cafe-pos.toml (Linux)                           │
//! │     ~/Library/Application Support/com.cafe.pos/cafe-pos.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     127.0.0.1:8080, ./cafe.db, IST, 5% GST                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cafe-pos.toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! path = "/var/lib/cafe/cafe.db"
//! max_connections = 5
//!
//! [printing]
//! spool_dir = "/var/spool/cafe"
//!
//! [locale]
//! utc_offset_minutes = 330   # IST
//! default_tax_rate = 5.0     # percent, for menu items posted without a rate
//! ```

use cafe_core::{TaxRate, DEFAULT_UTC_OFFSET_MINUTES};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "cafe-pos.toml";

/// Largest offset from UTC any real time zone uses (UTC+14 / UTC-12).
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Interface to bind (default: 127.0.0.1, the till itself).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl HttpSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file; created on first start.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./cafe.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintSettings {
    /// Directory receipts and reports are written to for the print daemon.
    #[serde(default = "default_spool_dir")]
    pub spool_dir: PathBuf,
}

fn default_spool_dir() -> PathBuf {
    PathBuf::from("./spool")
}

impl Default for PrintSettings {
    fn default() -> Self {
        PrintSettings {
            spool_dir: default_spool_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleSettings {
    /// Offset used for printed dates, invoice numbers and report days.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,

    /// GST percentage applied to menu items created without a rate.
    #[serde(default = "default_tax_rate")]
    pub default_tax_rate: f64,
}

fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}

fn default_tax_rate() -> f64 {
    5.0
}

impl Default for LocaleSettings {
    fn default() -> Self {
        LocaleSettings {
            utc_offset_minutes: default_utc_offset_minutes(),
            default_tax_rate: default_tax_rate(),
        }
    }
}

// =============================================================================
// Server Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub printing: PrintSettings,

    #[serde(default)]
    pub locale: LocaleSettings,
}

impl ServerConfig {
    /// Loads configuration: defaults, then the TOML file, then environment.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading server config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load server config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("port must be greater than 0".into()));
        }

        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_addr must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.locale.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_minutes must be within ±{}, got {}",
                MAX_UTC_OFFSET_MINUTES, self.locale.utc_offset_minutes
            )));
        }

        let rate = self.locale.default_tax_rate;
        if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
            return Err(ConfigError::Invalid(format!(
                "default_tax_rate must be between 0 and 100, got {}",
                rate
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `CAFE_*` overrides from `lookup`. Values that fail to parse
    /// are ignored with a warning.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("CAFE_BIND_ADDR") {
            debug!(bind_addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("CAFE_PORT") {
            match port.parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(_) => warn!(value = %port, "Ignoring invalid CAFE_PORT"),
            }
        }

        if let Some(path) = lookup("CAFE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("CAFE_SPOOL_DIR") {
            self.printing.spool_dir = PathBuf::from(dir);
        }

        if let Some(offset) = lookup("CAFE_UTC_OFFSET_MINUTES") {
            match offset.parse::<i32>() {
                Ok(minutes) => self.locale.utc_offset_minutes = minutes,
                Err(_) => warn!(value = %offset, "Ignoring invalid CAFE_UTC_OFFSET_MINUTES"),
            }
        }

        if let Some(rate) = lookup("CAFE_DEFAULT_TAX_RATE") {
            match rate.parse::<f64>() {
                Ok(r) => self.locale.default_tax_rate = r,
                Err(_) => warn!(value = %rate, "Ignoring invalid CAFE_DEFAULT_TAX_RATE"),
            }
        }
    }

    /// Platform config path, e.g. `~/.config/cafe-pos/cafe-pos.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cafe", "pos")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The cafe's local offset. Falls back to UTC if the configured value
    /// was never validated.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.locale.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    pub fn default_tax_rate(&self) -> TaxRate {
        TaxRate::from_percentage(self.locale.default_tax_rate)
    }
}
