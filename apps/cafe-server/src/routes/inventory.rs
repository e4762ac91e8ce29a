//! Stock room.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use cafe_core::InventoryItem;
use cafe_db::NewInventoryItem;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list).post(create))
        .route("/inventory/search", get(search))
        .route("/inventory/low-stock", get(low_stock))
        .route("/inventory/{id}", put(update).delete(delete))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<InventoryItem>>> {
    Ok(Json(state.db.inventory().list().await?))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<InventoryItem>>> {
    Ok(Json(state.db.inventory().search(&params.q).await?))
}

/// Items at or below their reorder point.
async fn low_stock(State(state): State<AppState>) -> ApiResult<Json<Vec<InventoryItem>>> {
    Ok(Json(state.db.inventory().low_stock().await?))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewInventoryItem>,
) -> ApiResult<(StatusCode, Json<InventoryItem>)> {
    let item = state.db.inventory().create(&body).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewInventoryItem>,
) -> ApiResult<Json<InventoryItem>> {
    Ok(Json(state.db.inventory().update(id, &body).await?))
}

async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    state.db.inventory().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
