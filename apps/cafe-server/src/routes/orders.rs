//! # Order Routes
//!
//! ```text
//! POST /orders                    open an order (table, regime, customer)
//! POST /orders/{id}/items         add a menu item; the first one seats the table
//! PUT  /orders/{id}/items/{line}  change quantity (0 removes)
//! POST /orders/{id}/prepare       send to kitchen
//! POST /orders/{id}/finalize      take payment, assign invoice, free table
//! GET  /orders/{id}/receipt       printable HTML
//! POST /orders/{id}/receipt/print spool the receipt
//! ```

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use cafe_core::render::{render_receipt, Document, ReceiptOrder};
use cafe_core::{aggregate, CoreError, LineItem, Order, OrderItem, OrderStatus, TaxBreakdown};
use cafe_db::{FinalizeOrder, NewOrder};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list).post(create))
        .route("/orders/active", get(active))
        .route("/orders/{id}", get(detail))
        .route("/orders/{id}/items", post(add_item))
        .route("/orders/{id}/items/{item_id}", put(update_item).delete(remove_item))
        .route("/orders/{id}/prepare", post(prepare))
        .route("/orders/{id}/finalize", post(finalize))
        .route("/orders/{id}/cancel", post(cancel))
        .route("/orders/{id}/receipt", get(receipt))
        .route("/orders/{id}/receipt/print", post(print_receipt))
}

// =============================================================================
// Bodies
// =============================================================================

#[derive(Debug, Deserialize)]
struct AddItem {
    menu_item_id: i64,
    #[serde(default = "default_quantity")]
    quantity: i64,
    #[serde(default)]
    notes: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
struct UpdateQuantity {
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct FinalizeBody {
    #[serde(flatten)]
    payment: FinalizeOrder,
    /// Spool the receipt straight after payment.
    #[serde(default)]
    print_receipt: bool,
}

/// An order with its lines and tax breakdown.
#[derive(Debug, Serialize)]
struct OrderDetail {
    #[serde(flatten)]
    order: Order,
    items: Vec<OrderItem>,
    breakdown: TaxBreakdown,
}

#[derive(Debug, Serialize)]
struct FinalizeResponse {
    #[serde(flatten)]
    order: Order,
    receipt_printed: bool,
}

// =============================================================================
// Orders
// =============================================================================

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(state.db.orders().list().await?))
}

/// Pending and preparing orders, the kitchen and floor view.
async fn active(State(state): State<AppState>) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(state.db.orders().active().await?))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewOrder>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = state.db.orders().create(&body).await?;
    info!(order_id = order.id, table_id = ?order.table_id, "Order opened");
    Ok((StatusCode::CREATED, Json(order)))
}

async fn detail(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<OrderDetail>> {
    let (order, items) = load_order(&state, id).await?;
    let breakdown = breakdown(&order, &items);
    Ok(Json(OrderDetail {
        order,
        items,
        breakdown,
    }))
}

/// Stored totals once paid; recomputed from the lines while still open.
fn breakdown(order: &Order, items: &[OrderItem]) -> TaxBreakdown {
    if order.status == OrderStatus::Completed {
        return order.tax_breakdown();
    }
    let lines: Vec<LineItem> = items.iter().map(LineItem::from).collect();
    aggregate(&lines, order.tax_regime).rounded()
}

async fn load_order(state: &AppState, id: i64) -> ApiResult<(Order, Vec<OrderItem>)> {
    let order = state
        .db
        .orders()
        .get(id)
        .await?
        .ok_or(CoreError::OrderNotFound(id))?;
    let items = state.db.orders().items(id).await?;
    Ok((order, items))
}

// =============================================================================
// Lines
// =============================================================================

async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<AddItem>,
) -> ApiResult<(StatusCode, Json<OrderItem>)> {
    let menu_item = state
        .db
        .menu()
        .get_item(body.menu_item_id)
        .await?
        .ok_or(CoreError::MenuItemNotFound(body.menu_item_id))?;

    if !menu_item.available {
        return Err(ApiError::new(
            ErrorCode::Conflict,
            format!("{} is not available", menu_item.name),
        ));
    }

    let line = LineItem::from_menu_item(&menu_item, body.quantity).with_notes(body.notes);
    let item = state.db.orders().add_item(id, &line).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Returns the updated line, or 204 when a zero quantity removed it.
async fn update_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(i64, i64)>,
    Json(body): Json<UpdateQuantity>,
) -> ApiResult<axum::response::Response> {
    let updated = state
        .db
        .orders()
        .update_item_quantity(id, item_id, body.quantity)
        .await?;

    Ok(match updated {
        Some(item) => Json(item).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

async fn remove_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state.db.orders().remove_item(id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Lifecycle
// =============================================================================

async fn prepare(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Order>> {
    Ok(Json(state.db.orders().prepare(id).await?))
}

async fn finalize(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<FinalizeBody>,
) -> ApiResult<Json<FinalizeResponse>> {
    let order = state
        .db
        .orders()
        .finalize(id, &body.payment, state.config.utc_offset())
        .await?;

    info!(
        order_id = order.id,
        invoice = ?order.invoice_number,
        total_paise = order.total_paise,
        "Order paid"
    );

    // The payment stands even if the printer is out of paper.
    let mut receipt_printed = false;
    if body.print_receipt {
        match receipt_document(&state, id).await {
            Ok(document) => match state.print(document).await {
                Ok(()) => receipt_printed = true,
                Err(e) => warn!(order_id = id, "Receipt not printed: {}", e),
            },
            Err(e) => warn!(order_id = id, "Receipt not rendered: {}", e),
        }
    }

    Ok(Json(FinalizeResponse {
        order,
        receipt_printed,
    }))
}

async fn cancel(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Order>> {
    let order = state.db.orders().cancel(id).await?;
    info!(order_id = id, "Order cancelled");
    Ok(Json(order))
}

// =============================================================================
// Receipts
// =============================================================================

/// Renders the receipt of a paid order.
async fn receipt_document(state: &AppState, id: i64) -> ApiResult<Document> {
    let (order, items) = load_order(state, id).await?;

    let payment_method = match (order.status, order.payment_method) {
        (OrderStatus::Completed, Some(method)) => method,
        _ => {
            return Err(CoreError::InvalidOrderStatus {
                order_id: id,
                current_status: order.status,
            }
            .into())
        }
    };

    let cafe = state.cafe_info().await;
    Ok(render_receipt(
        &ReceiptOrder::from_order(&order, &items),
        &order.tax_breakdown(),
        payment_method,
        &cafe,
        state.config.utc_offset(),
    ))
}

async fn receipt(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<impl IntoResponse> {
    let document = receipt_document(&state, id).await?;
    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Html(document.html),
    ))
}

async fn print_receipt(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let document = receipt_document(&state, id).await?;
    state.print(document).await?;
    Ok(StatusCode::ACCEPTED)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::routes::test_support::{app, send, send_json};

    async fn seed_menu(app: &axum::Router) -> (i64, i64) {
        let (_, latte) = send_json(
            app,
            Method::POST,
            "/api/menu-items",
            Some(json!({ "name": "Cafe Latte", "price_paise": 6000, "stock_quantity": 20 })),
        )
        .await;
        let (_, cookie) = send_json(
            app,
            Method::POST,
            "/api/menu-items",
            Some(json!({ "name": "Cookie", "price_paise": 1000 })),
        )
        .await;
        (latte["id"].as_i64().unwrap(), cookie["id"].as_i64().unwrap())
    }

    async fn open_order(app: &axum::Router, body: Value) -> i64 {
        let (status, order) = send_json(app, Method::POST, "/api/orders", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        order["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_order_flow_with_receipt() {
        let (app, printer) = app().await;
        let (latte, cookie) = seed_menu(&app).await;

        let (_, table) = send_json(
            &app,
            Method::POST,
            "/api/tables",
            Some(json!({ "name": "T1", "capacity": 4 })),
        )
        .await;
        let table_id = table["id"].as_i64().unwrap();

        let order = open_order(&app, json!({ "table_id": table_id })).await;
        let items = format!("/api/orders/{}/items", order);

        let (status, _) = send_json(
            &app,
            Method::POST,
            &items,
            Some(json!({ "menu_item_id": latte, "quantity": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        send_json(&app, Method::POST, &items, Some(json!({ "menu_item_id": cookie }))).await;

        let (_, tables) = send_json(&app, Method::GET, "/api/tables", None).await;
        assert_eq!(tables[0]["occupied"], true);

        let (status, detail) =
            send_json(&app, Method::GET, &format!("/api/orders/{}", order), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["items"].as_array().unwrap().len(), 2);
        assert_eq!(detail["breakdown"]["subtotal"], "130");
        assert_eq!(detail["breakdown"]["total"], "136.5");

        let (status, paid) = send_json(
            &app,
            Method::POST,
            &format!("/api/orders/{}/finalize", order),
            Some(json!({ "payment_method": "upi", "print_receipt": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(paid["status"], "completed");
        assert_eq!(paid["total_paise"], 13650);
        assert_eq!(paid["receipt_printed"], true);
        assert!(paid["invoice_number"].as_str().unwrap().starts_with("INV-"));
        assert_eq!(printer.printed.lock().unwrap().len(), 1);

        let (_, tables) = send_json(&app, Method::GET, "/api/tables", None).await;
        assert_eq!(tables[0]["occupied"], false);

        let (status, html) =
            send(&app, Method::GET, &format!("/api/orders/{}/receipt", order), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Cafe Latte"));
        assert!(html.contains("UPI"));

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/orders/{}/receipt/print", order),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(printer.printed.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_finalize_empty_order_conflicts() {
        let (app, _) = app().await;
        let order = open_order(&app, json!({})).await;

        let (status, body) = send_json(
            &app,
            Method::POST,
            &format!("/api/orders/{}/finalize", order),
            Some(json!({ "payment_method": "cash" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_receipt_requires_payment() {
        let (app, _) = app().await;
        let order = open_order(&app, json!({})).await;

        let (status, _) =
            send(&app, Method::GET, &format!("/api/orders/{}/receipt", order), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send_json(&app, Method::GET, "/api/orders/999/receipt", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Order not found: 999");
    }

    #[tokio::test]
    async fn test_line_editing_and_cancel() {
        let (app, _) = app().await;
        let (latte, _) = seed_menu(&app).await;
        let order = open_order(&app, json!({ "tax_regime": "igst" })).await;

        let (_, line) = send_json(
            &app,
            Method::POST,
            &format!("/api/orders/{}/items", order),
            Some(json!({ "menu_item_id": latte })),
        )
        .await;
        let line_uri = format!("/api/orders/{}/items/{}", order, line["id"]);

        let (status, updated) =
            send_json(&app, Method::PUT, &line_uri, Some(json!({ "quantity": 3 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["total_price_paise"], 18000);

        let (_, detail) = send_json(&app, Method::GET, &format!("/api/orders/{}", order), None).await;
        assert_eq!(detail["breakdown"]["igst"], "9");
        assert_eq!(detail["breakdown"]["cgst"], "0");

        let (status, _) = send(&app, Method::PUT, &line_uri, Some(json!({ "quantity": 0 }))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, prepared) = send_json(
            &app,
            Method::POST,
            &format!("/api/orders/{}/prepare", order),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(prepared["status"], "preparing");

        let (status, cancelled) =
            send_json(&app, Method::POST, &format!("/api/orders/{}/cancel", order), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cancelled["status"], "cancelled");

        let (_, active) = send_json(&app, Method::GET, "/api/orders/active", None).await;
        assert!(active.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_menu_item_is_404() {
        let (app, _) = app().await;
        let order = open_order(&app, json!({})).await;

        let (status, _) = send_json(
            &app,
            Method::POST,
            &format!("/api/orders/{}/items", order),
            Some(json!({ "menu_item_id": 42 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
