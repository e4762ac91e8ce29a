//! Key/value settings (cafe name, address, GSTIN, receipt footer).

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use cafe_core::Setting;
use cafe_db::NewSetting;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/settings", get(list).post(upsert))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Setting>>> {
    Ok(Json(state.db.settings().list().await?))
}

/// Creates the key or overwrites its value.
async fn upsert(
    State(state): State<AppState>,
    Json(body): Json<NewSetting>,
) -> ApiResult<Json<Setting>> {
    Ok(Json(state.db.settings().upsert(&body).await?))
}
