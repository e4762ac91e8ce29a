//! Dining tables.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use cafe_core::DiningTable;
use cafe_db::NewTable;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tables", get(list).post(create))
        .route("/tables/{id}", put(update).delete(delete))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<DiningTable>>> {
    Ok(Json(state.db.tables().list().await?))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewTable>,
) -> ApiResult<(StatusCode, Json<DiningTable>)> {
    let table = state.db.tables().create(&body).await?;
    Ok((StatusCode::CREATED, Json(table)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewTable>,
) -> ApiResult<Json<DiningTable>> {
    Ok(Json(state.db.tables().update(id, &body).await?))
}

async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    state.db.tables().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
