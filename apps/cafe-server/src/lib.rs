//! # cafe-server: HTTP API for Cafe POS
//!
//! Serves the till UI: menu, tables, orders, shifts, expenses, settings
//! and reports as JSON, plus printable HTML receipts and reports.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Server Startup                                    │
//! │                                                                         │
//! │  1. Initialize Logging ────────── tracing + EnvFilter                   │
//! │  2. Load Config ───────────────── defaults → cafe-pos.toml → CAFE_*     │
//! │  3. Open Database ─────────────── SQLite pool + migrations              │
//! │  4. Build Router ──────────────── /health, /api/*                       │
//! │  5. Serve ─────────────────────── until Ctrl+C / SIGTERM                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod print;
pub mod routes;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use cafe_db::{Database, DbConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ConfigError};
pub use print::SpoolPrinter;
pub use routes::router;
pub use state::AppState;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,cafe=debug,sqlx=warn";

/// Initializes the tracing subscriber; `RUST_LOG` overrides the default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    subscriber(filter).init();
}

fn subscriber(filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt().with_env_filter(filter).finish()
}

/// Opens the database, binds the listener and serves until shutdown.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let db_config = DbConfig::new(&config.database.path)
        .max_connections(config.database.max_connections);
    let db = Database::new(db_config)
        .await
        .with_context(|| format!("opening database {}", config.database.path.display()))?;

    let printer = Arc::new(SpoolPrinter::new(&config.printing.spool_dir));
    info!(spool = %printer.dir().display(), "Printing to spool directory");

    let bind_addr = config.server.bind_address();
    let state = AppState::new(db.clone(), config, printer);
    let app = router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;
    info!(addr = %bind_addr, "Cafe POS server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
