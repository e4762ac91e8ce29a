//! # Application State
//!
//! Shared by every handler through axum's `State` extractor. Cloning is
//! cheap: the database handle wraps a pool and the rest sits behind `Arc`.

use std::sync::Arc;

use cafe_core::render::{present, Document, PrintSurface};
use cafe_core::CafeInfo;
use cafe_db::Database;
use tracing::warn;

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ServerConfig>,
    pub printer: Arc<dyn PrintSurface + Send + Sync>,
}

impl AppState {
    pub fn new(
        db: Database,
        config: ServerConfig,
        printer: Arc<dyn PrintSurface + Send + Sync>,
    ) -> Self {
        AppState {
            db,
            config: Arc::new(config),
            printer,
        }
    }

    /// Cafe identity for printed documents. A failed settings read falls
    /// back to the built-in defaults rather than failing the print.
    pub async fn cafe_info(&self) -> CafeInfo {
        let lookup = self.db.settings().settings_map().await;
        if let Err(e) = &lookup {
            warn!("Could not read cafe settings, using defaults: {}", e);
        }
        CafeInfo::from_lookup(lookup)
    }

    /// Hands a document to the print surface off the async runtime.
    pub async fn print(&self, document: Document) -> ApiResult<()> {
        let printer = Arc::clone(&self.printer);
        tokio::task::spawn_blocking(move || present(&*printer, &document))
            .await
            .map_err(|e| ApiError::internal(format!("Print task failed: {}", e)))?
            .map_err(ApiError::from)
    }
}
