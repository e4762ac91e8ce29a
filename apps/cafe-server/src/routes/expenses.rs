//! Back-office expenses.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use cafe_core::Expense;
use cafe_db::NewExpense;

use super::DateQuery;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list).post(create))
        .route("/expenses/{id}", get(get_one).put(update).delete(delete))
}

/// All expenses, or those dated inside `start_date..=end_date`.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<Vec<Expense>>> {
    let expenses = match query.range(state.config.utc_offset())? {
        Some(range) => state.db.expenses().by_date_range(&range).await?,
        None => state.db.expenses().list().await?,
    };
    Ok(Json(expenses))
}

async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Expense>> {
    state
        .db
        .expenses()
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Expense", id))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewExpense>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let expense = state.db.expenses().create(&body).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewExpense>,
) -> ApiResult<Json<Expense>> {
    Ok(Json(state.db.expenses().update(id, &body).await?))
}

async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    state.db.expenses().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
