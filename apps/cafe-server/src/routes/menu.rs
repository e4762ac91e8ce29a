//! Categories and menu items.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use cafe_core::{Category, MenuItem, TaxRate};
use cafe_db::{NewCategory, NewMenuItem};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", put(update_category).delete(delete_category))
        .route("/menu-items", get(list_items).post(create_item))
        .route("/menu-items/category/{id}", get(items_by_category))
        .route(
            "/menu-items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}

// =============================================================================
// Categories
// =============================================================================

async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.menu().list_categories().await?))
}

async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = state.db.menu().create_category(&body).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewCategory>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.db.menu().update_category(id, &body).await?))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.db.menu().delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Menu Items
// =============================================================================

/// Menu item body as posted by the till. `tax_rate_bps` may be left out,
/// in which case the configured default GST rate applies.
#[derive(Debug, Deserialize)]
struct MenuItemBody {
    name: String,
    #[serde(default)]
    description: Option<String>,
    price_paise: i64,
    #[serde(default)]
    category_id: Option<i64>,
    #[serde(default)]
    tax_rate_bps: Option<u32>,
    #[serde(default = "default_available")]
    available: bool,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    stock_quantity: i64,
}

fn default_available() -> bool {
    true
}

impl MenuItemBody {
    fn into_new_item(self, default_rate: TaxRate) -> NewMenuItem {
        NewMenuItem {
            name: self.name,
            description: self.description,
            price_paise: self.price_paise,
            category_id: self.category_id,
            tax_rate_bps: self.tax_rate_bps.unwrap_or(default_rate.bps()),
            available: self.available,
            image_url: self.image_url,
            stock_quantity: self.stock_quantity,
        }
    }
}

async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<MenuItem>>> {
    Ok(Json(state.db.menu().list_items().await?))
}

async fn items_by_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<MenuItem>>> {
    Ok(Json(state.db.menu().items_by_category(id).await?))
}

async fn get_item(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<MenuItem>> {
    state
        .db
        .menu()
        .get_item(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Menu item", id))
}

async fn create_item(
    State(state): State<AppState>,
    Json(body): Json<MenuItemBody>,
) -> ApiResult<(StatusCode, Json<MenuItem>)> {
    let item = body.into_new_item(state.config.default_tax_rate());
    let created = state.db.menu().create_item(&item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<MenuItemBody>,
) -> ApiResult<Json<MenuItem>> {
    let item = body.into_new_item(state.config.default_tax_rate());
    Ok(Json(state.db.menu().update_item(id, &item).await?))
}

async fn delete_item(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    state.db.menu().delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{app, send_json};

    #[tokio::test]
    async fn test_item_without_rate_gets_configured_default() {
        let (app, _) = app().await;

        let (status, category) = send_json(
            &app,
            Method::POST,
            "/api/categories",
            Some(json!({ "name": "Bar" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, plain) = send_json(
            &app,
            Method::POST,
            "/api/menu-items",
            Some(json!({ "name": "Espresso", "price_paise": 12000 })),
        )
        .await;
        assert_eq!(plain["tax_rate_bps"], 500);
        assert_eq!(plain["available"], true);

        let (_, beer) = send_json(
            &app,
            Method::POST,
            "/api/menu-items",
            Some(json!({
                "name": "Craft Beer",
                "price_paise": 35000,
                "category_id": category["id"],
                "tax_rate_bps": 1800
            })),
        )
        .await;
        assert_eq!(beer["tax_rate_bps"], 1800);

        let (_, in_bar) = send_json(
            &app,
            Method::GET,
            &format!("/api/menu-items/category/{}", category["id"]),
            None,
        )
        .await;
        assert_eq!(in_bar.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_category_conflicts() {
        let (app, _) = app().await;
        let body = json!({ "name": "Desserts" });

        send_json(&app, Method::POST, "/api/categories", Some(body.clone())).await;
        let (status, err) = send_json(&app, Method::POST, "/api/categories", Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(err["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_invalid_price_and_missing_item() {
        let (app, _) = app().await;

        let (status, err) = send_json(
            &app,
            Method::POST,
            "/api/menu-items",
            Some(json!({ "name": "Free Water", "price_paise": -1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "VALIDATION_ERROR");

        let (status, _) = send_json(&app, Method::DELETE, "/api/menu-items/77", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
