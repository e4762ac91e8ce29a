//! Employee clock-in / clock-out.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use cafe_core::EmployeeShift;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shifts", get(list))
        .route("/shifts/active", get(active))
        .route("/shifts/user/{user_id}", get(by_user))
        .route("/shifts/clock-in", post(clock_in))
        .route("/shifts/clock-out/{id}", post(clock_out))
}

#[derive(Debug, Deserialize)]
struct ClockIn {
    user_id: i64,
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<EmployeeShift>>> {
    Ok(Json(state.db.shifts().list().await?))
}

async fn active(State(state): State<AppState>) -> ApiResult<Json<Vec<EmployeeShift>>> {
    Ok(Json(state.db.shifts().active().await?))
}

async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<EmployeeShift>>> {
    Ok(Json(state.db.shifts().by_user(user_id).await?))
}

async fn clock_in(
    State(state): State<AppState>,
    Json(body): Json<ClockIn>,
) -> ApiResult<(StatusCode, Json<EmployeeShift>)> {
    let shift = state.db.shifts().clock_in(body.user_id).await?;
    Ok((StatusCode::CREATED, Json(shift)))
}

async fn clock_out(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EmployeeShift>> {
    Ok(Json(state.db.shifts().clock_out(id).await?))
}
