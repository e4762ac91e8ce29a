//! Staff. There is no delete: deactivate with `active: false` instead.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use cafe_core::User;
use cafe_db::NewUser;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/{id}", get(get_one).put(update))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.db.users().list().await?))
}

async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<User>> {
    state
        .db
        .users()
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User", id))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.db.users().create(&body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewUser>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.db.users().update(id, &body).await?))
}
