//! # Order Repository
//!
//! Orders, their lines, and the payment step that freezes them.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Lifecycle                                  │
//! │                                                                         │
//! │  create() ──► Pending ──prepare()──► Preparing                          │
//! │                  │                      │                               │
//! │   add_item()     │   update/remove      │   (lines still editable,      │
//! │   seats table    │   recompute totals   │    totals kept current)       │
//! │                  │                      │                               │
//! │                  └──────────┬───────────┘                               │
//! │                             ▼                                           │
//! │  finalize() ── one transaction ──────────────────────────────────────┐  │
//! │  │ 1. aggregate lines at their own GST rates, round to paise         │  │
//! │  │ 2. status = completed, payment method, customer, invoice number   │  │
//! │  │ 3. take sold units out of menu stock                              │  │
//! │  │ 4. free the dining table                                          │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │                             │                                           │
//! │                             ▼                                           │
//! │                         Completed ──cancel()──► Cancelled               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines keep the name, price and rate they had when they were added, so
//! menu edits never change an order after the fact.

use cafe_core::error::CoreError;
use cafe_core::order::CustomerDetails;
use cafe_core::report::DateRange;
use cafe_core::validation::{
    validate_item_name, validate_price_paise, validate_quantity, validate_tax_rate_bps,
};
use cafe_core::{
    aggregate, LineItem, Order, OrderDraft, OrderItem, OrderStatus, PaymentMethod, TaxBreakdown,
    TaxRegime, MAX_ITEM_QUANTITY, MAX_ORDER_ITEMS,
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::menu::take_stock;
use crate::repository::table::mark_occupied;

const ORDER_COLUMNS: &str = "id, table_id, user_id, status, tax_regime, subtotal_paise, \
                             cgst_paise, sgst_paise, igst_paise, total_paise, payment_method, \
                             customer_name, customer_phone, customer_gstin, invoice_number, \
                             created_at, completed_at";

const ORDER_ITEM_COLUMNS: &str = "id, order_id, menu_item_id, name, quantity, unit_price_paise, \
                                  total_price_paise, tax_rate_bps, notes, created_at";

// =============================================================================
// Inputs
// =============================================================================

/// Body of an order create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrder {
    #[serde(default)]
    pub table_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub tax_regime: TaxRegime,
    #[serde(default)]
    pub customer: CustomerDetails,
}

/// Body of the payment step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeOrder {
    pub payment_method: PaymentMethod,
    /// Buyer details to print on the invoice; blank fields keep whatever
    /// the order already had.
    #[serde(default)]
    pub customer: CustomerDetails,
}

/// Invoice number for a paid order: `INV-20261019-00042`.
///
/// The date is the cafe's local date at payment time.
pub fn invoice_number(order_id: i64, paid_at: DateTime<FixedOffset>) -> String {
    format!("INV-{}-{:05}", paid_at.format("%Y%m%d"), order_id)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for orders and order lines.
///
/// ## Usage
/// ```rust,ignore
/// let repo = OrderRepository::new(pool);
///
/// let order = repo.create(&NewOrder { table_id: Some(3), ..Default::default() }).await?;
/// repo.add_item(order.id, &LineItem::from_menu_item(&latte, 2)).await?;
/// let paid = repo.finalize(order.id, &payment, tz).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Opens a pending order with zero totals.
    pub async fn create(&self, new: &NewOrder) -> DbResult<Order> {
        let customer = new.customer.clone().normalized()?;
        let now = Utc::now();

        debug!(table_id = ?new.table_id, regime = new.tax_regime.as_str(), "Creating order");

        let result = sqlx::query(
            r#"
            INSERT INTO orders (
                table_id, user_id, status, tax_regime,
                customer_name, customer_phone, customer_gstin, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(new.table_id)
        .bind(new.user_id)
        .bind(OrderStatus::Pending)
        .bind(new.tax_regime)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.gstin)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id.to_string()))
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS);
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// All orders, newest first.
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders ORDER BY created_at DESC, id DESC",
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Orders still on the floor (pending or preparing), oldest first.
    pub async fn active(&self) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE status IN (?1, ?2) ORDER BY created_at, id",
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(OrderStatus::Pending)
            .bind(OrderStatus::Preparing)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Orders created inside the half-open `range`, oldest first.
    pub async fn by_date_range(&self, range: &DateRange) -> DbResult<Vec<Order>> {
        debug!(start = %range.start, end = %range.end, "Loading orders for range");

        let sql = format!(
            "SELECT {} FROM orders WHERE created_at >= ?1 AND created_at < ?2 \
             ORDER BY created_at, id",
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    // -------------------------------------------------------------------------
    // Lines
    // -------------------------------------------------------------------------

    pub async fn items(&self, order_id: i64) -> DbResult<Vec<OrderItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_items(&mut conn, order_id).await
    }

    /// Adds a line to an editable order.
    ///
    /// A line from the same menu item with the same price, rate and note is
    /// merged into the existing one. The first line on a table's order
    /// marks the table occupied.
    pub async fn add_item(&self, order_id: i64, item: &LineItem) -> DbResult<OrderItem> {
        validate_item_name(&item.name)?;
        validate_quantity(item.quantity)?;
        validate_price_paise(item.unit_price.paise())?;
        validate_tax_rate_bps(item.tax_rate.bps())?;

        let unit_price_paise = item.unit_price.paise();
        let mut tx = self.pool.begin().await?;
        let order = editable_order(&mut tx, order_id).await?;

        let existing: Option<(i64, i64)> = match item.menu_item_id {
            Some(menu_item_id) => {
                sqlx::query_as(
                    r#"
                    SELECT id, quantity FROM order_items
                    WHERE order_id = ?1
                      AND menu_item_id = ?2
                      AND unit_price_paise = ?3
                      AND tax_rate_bps = ?4
                      AND notes IS ?5
                    "#,
                )
                .bind(order_id)
                .bind(menu_item_id)
                .bind(unit_price_paise)
                .bind(item.tax_rate.bps())
                .bind(&item.notes)
                .fetch_optional(&mut *tx)
                .await?
            }
            None => None,
        };

        let item_id = match existing {
            Some((line_id, quantity)) => {
                let merged = quantity + item.quantity;
                if merged > MAX_ITEM_QUANTITY {
                    return Err(CoreError::QuantityTooLarge {
                        requested: merged,
                        max: MAX_ITEM_QUANTITY,
                    }
                    .into());
                }

                debug!(order_id, line_id, quantity = merged, "Merging order line");
                set_line_quantity(&mut tx, order_id, line_id, merged).await?;
                line_id
            }
            None => {
                let lines: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = ?1")
                        .bind(order_id)
                        .fetch_one(&mut *tx)
                        .await?;
                if usize::try_from(lines).unwrap_or(usize::MAX) >= MAX_ORDER_ITEMS {
                    return Err(CoreError::OrderTooLarge {
                        max: MAX_ORDER_ITEMS,
                    }
                    .into());
                }

                debug!(order_id, name = %item.name, quantity = item.quantity, "Adding order line");
                let result = sqlx::query(
                    r#"
                    INSERT INTO order_items (
                        order_id, menu_item_id, name, quantity, unit_price_paise,
                        total_price_paise, tax_rate_bps, notes, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                )
                .bind(order_id)
                .bind(item.menu_item_id)
                .bind(item.name.trim())
                .bind(item.quantity)
                .bind(unit_price_paise)
                .bind(unit_price_paise * item.quantity)
                .bind(item.tax_rate.bps())
                .bind(&item.notes)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
                result.last_insert_rowid()
            }
        };

        if let Some(table_id) = order.table_id {
            mark_occupied(&mut tx, table_id, true).await?;
        }

        store_totals(&mut tx, &order).await?;
        let line = fetch_item(&mut tx, order_id, item_id).await?;
        tx.commit().await?;

        Ok(line)
    }

    /// Sets a line's quantity; zero removes the line and returns `None`.
    pub async fn update_item_quantity(
        &self,
        order_id: i64,
        item_id: i64,
        quantity: i64,
    ) -> DbResult<Option<OrderItem>> {
        if quantity == 0 {
            self.remove_item(order_id, item_id).await?;
            return Ok(None);
        }
        validate_quantity(quantity)?;

        let mut tx = self.pool.begin().await?;
        let order = editable_order(&mut tx, order_id).await?;

        set_line_quantity(&mut tx, order_id, item_id, quantity).await?;
        store_totals(&mut tx, &order).await?;
        let line = fetch_item(&mut tx, order_id, item_id).await?;
        tx.commit().await?;

        Ok(Some(line))
    }

    pub async fn remove_item(&self, order_id: i64, item_id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        let order = editable_order(&mut tx, order_id).await?;

        let result = sqlx::query("DELETE FROM order_items WHERE id = ?1 AND order_id = ?2")
            .bind(item_id)
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ItemNotInOrder(item_id.to_string()).into());
        }

        debug!(order_id, item_id, "Removed order line");
        store_totals(&mut tx, &order).await?;
        tx.commit().await?;

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Sends a pending order to the kitchen.
    pub async fn prepare(&self, order_id: i64) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;
        let order = fetch_order(&mut tx, order_id).await?;
        ensure_transition(&order, OrderStatus::Preparing)?;

        set_status(&mut tx, order_id, OrderStatus::Preparing).await?;
        let order = fetch_order(&mut tx, order_id).await?;
        tx.commit().await?;

        info!(order_id, "Order sent to kitchen");
        Ok(order)
    }

    /// Takes payment and freezes the order.
    ///
    /// Runs as one transaction: either every step below lands or none do.
    /// 1. Lines are aggregated at their own rates under the order's regime
    ///    and rounded to paise
    /// 2. Status, totals, payment method, customer details, invoice number
    ///    and completion time are written
    /// 3. Sold quantities are taken out of menu stock
    /// 4. The dining table is freed
    ///
    /// ## Errors
    /// - `InvalidOrderStatus` if the order is already completed or cancelled
    /// - `EmptyOrder` if it has no lines
    pub async fn finalize(
        &self,
        order_id: i64,
        payment: &FinalizeOrder,
        tz: FixedOffset,
    ) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;
        let order = fetch_order(&mut tx, order_id).await?;
        ensure_transition(&order, OrderStatus::Completed)?;

        let items = fetch_items(&mut tx, order_id).await?;
        let lines: Vec<LineItem> = items.iter().map(LineItem::from).collect();

        let mut draft = OrderDraft::from_items(lines, order.tax_regime);
        draft.set_customer(merge_customer(&order, &payment.customer))?;
        let finalized = draft.finalize(payment.payment_method)?;

        let paid_at = Utc::now();
        let invoice = invoice_number(order_id, paid_at.with_timezone(&tz));
        let totals = &finalized.totals;

        sqlx::query(
            r#"
            UPDATE orders SET
                status = ?2,
                subtotal_paise = ?3,
                cgst_paise = ?4,
                sgst_paise = ?5,
                igst_paise = ?6,
                total_paise = ?7,
                payment_method = ?8,
                customer_name = ?9,
                customer_phone = ?10,
                customer_gstin = ?11,
                invoice_number = ?12,
                completed_at = ?13
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .bind(OrderStatus::Completed)
        .bind(totals.subtotal.paise())
        .bind(totals.cgst.paise())
        .bind(totals.sgst.paise())
        .bind(totals.igst.paise())
        .bind(totals.total.paise())
        .bind(finalized.payment_method)
        .bind(&finalized.customer.name)
        .bind(&finalized.customer.phone)
        .bind(&finalized.customer.gstin)
        .bind(&invoice)
        .bind(paid_at)
        .execute(&mut *tx)
        .await?;

        for item in &items {
            if let Some(menu_item_id) = item.menu_item_id {
                take_stock(&mut tx, menu_item_id, item.quantity).await?;
            }
        }

        if let Some(table_id) = order.table_id {
            mark_occupied(&mut tx, table_id, false).await?;
        }

        let order = fetch_order(&mut tx, order_id).await?;
        tx.commit().await?;

        info!(
            order_id,
            invoice = %invoice,
            total_paise = order.total_paise,
            payment = finalized.payment_method.as_str(),
            "Order finalized"
        );
        Ok(order)
    }

    /// Voids an order. A table still held by the order is freed.
    pub async fn cancel(&self, order_id: i64) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;
        let order = fetch_order(&mut tx, order_id).await?;
        ensure_transition(&order, OrderStatus::Cancelled)?;

        set_status(&mut tx, order_id, OrderStatus::Cancelled).await?;

        if order.status.is_editable() {
            if let Some(table_id) = order.table_id {
                mark_occupied(&mut tx, table_id, false).await?;
            }
        }

        let cancelled = fetch_order(&mut tx, order_id).await?;
        tx.commit().await?;

        info!(order_id, previous = order.status.as_str(), "Order cancelled");
        Ok(cancelled)
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================

async fn fetch_order(conn: &mut SqliteConnection, order_id: i64) -> DbResult<Order> {
    let sql = format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS);
    sqlx::query_as::<_, Order>(&sql)
        .bind(order_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| CoreError::OrderNotFound(order_id).into())
}

async fn fetch_items(conn: &mut SqliteConnection, order_id: i64) -> DbResult<Vec<OrderItem>> {
    let sql = format!(
        "SELECT {} FROM order_items WHERE order_id = ?1 ORDER BY id",
        ORDER_ITEM_COLUMNS
    );
    let items = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(conn)
        .await?;

    Ok(items)
}

async fn fetch_item(conn: &mut SqliteConnection, order_id: i64, item_id: i64) -> DbResult<OrderItem> {
    let sql = format!(
        "SELECT {} FROM order_items WHERE id = ?1 AND order_id = ?2",
        ORDER_ITEM_COLUMNS
    );
    sqlx::query_as::<_, OrderItem>(&sql)
        .bind(item_id)
        .bind(order_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| CoreError::ItemNotInOrder(item_id.to_string()).into())
}

/// Loads an order and checks its lines may still change.
async fn editable_order(conn: &mut SqliteConnection, order_id: i64) -> DbResult<Order> {
    let order = fetch_order(conn, order_id).await?;
    if !order.status.is_editable() {
        return Err(CoreError::InvalidOrderStatus {
            order_id,
            current_status: order.status,
        }
        .into());
    }
    Ok(order)
}

fn ensure_transition(order: &Order, next: OrderStatus) -> DbResult<()> {
    if order.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(CoreError::InvalidOrderStatus {
            order_id: order.id,
            current_status: order.status,
        }
        .into())
    }
}

async fn set_status(conn: &mut SqliteConnection, order_id: i64, status: OrderStatus) -> DbResult<()> {
    sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
        .bind(order_id)
        .bind(status)
        .execute(conn)
        .await?;
    Ok(())
}

async fn set_line_quantity(
    conn: &mut SqliteConnection,
    order_id: i64,
    item_id: i64,
    quantity: i64,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE order_items
        SET quantity = ?3, total_price_paise = unit_price_paise * ?3
        WHERE id = ?1 AND order_id = ?2
        "#,
    )
    .bind(item_id)
    .bind(order_id)
    .bind(quantity)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CoreError::ItemNotInOrder(item_id.to_string()).into());
    }
    Ok(())
}

/// Recomputes the running totals of an open order from its lines.
async fn store_totals(conn: &mut SqliteConnection, order: &Order) -> DbResult<TaxBreakdown> {
    let items = fetch_items(&mut *conn, order.id).await?;
    let lines: Vec<LineItem> = items.iter().map(LineItem::from).collect();
    let totals = aggregate(&lines, order.tax_regime).rounded();

    sqlx::query(
        r#"
        UPDATE orders SET
            subtotal_paise = ?2,
            cgst_paise = ?3,
            sgst_paise = ?4,
            igst_paise = ?5,
            total_paise = ?6
        WHERE id = ?1
        "#,
    )
    .bind(order.id)
    .bind(totals.subtotal.paise())
    .bind(totals.cgst.paise())
    .bind(totals.sgst.paise())
    .bind(totals.igst.paise())
    .bind(totals.total.paise())
    .execute(conn)
    .await?;

    Ok(totals)
}

/// Details given at payment take precedence; blank ones fall back to what
/// was captured when the order was opened.
fn merge_customer(order: &Order, supplied: &CustomerDetails) -> CustomerDetails {
    fn pick(supplied: &Option<String>, stored: &Option<String>) -> Option<String> {
        supplied
            .as_ref()
            .filter(|value| !value.trim().is_empty())
            .or(stored.as_ref())
            .cloned()
    }

    CustomerDetails {
        name: pick(&supplied.name, &order.customer_name),
        phone: pick(&supplied.phone, &order.customer_phone),
        gstin: pick(&supplied.gstin, &order.customer_gstin),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::menu::NewMenuItem;
    use crate::repository::table::NewTable;
    use crate::repository::test_support::database;
    use crate::Database;
    use cafe_core::{Money, TaxRate};
    use chrono::{Duration, TimeZone};

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    fn line(menu_item_id: i64, name: &str, quantity: i64, paise: i64, bps: u32) -> LineItem {
        LineItem {
            menu_item_id: Some(menu_item_id),
            ..LineItem::new(name, quantity, Money::from_paise(paise), TaxRate::from_bps(bps))
        }
    }

    fn pay(method: PaymentMethod) -> FinalizeOrder {
        FinalizeOrder {
            payment_method: method,
            customer: CustomerDetails::default(),
        }
    }

    async fn menu_item(db: &Database, name: &str, paise: i64, bps: u32) -> i64 {
        db.menu()
            .create_item(&NewMenuItem {
                name: name.to_string(),
                description: None,
                price_paise: paise,
                category_id: None,
                tax_rate_bps: bps,
                available: true,
                image_url: None,
                stock_quantity: 20,
            })
            .await
            .unwrap()
            .id
    }

    async fn table(db: &Database) -> i64 {
        db.tables()
            .create(&NewTable {
                name: "T1".to_string(),
                capacity: Some(4),
                occupied: false,
            })
            .await
            .unwrap()
            .id
    }

    #[test]
    fn test_invoice_number_format() {
        let paid_at = ist().with_ymd_and_hms(2026, 10, 19, 21, 5, 0).unwrap();
        assert_eq!(invoice_number(42, paid_at), "INV-20261019-00042");
    }

    #[test]
    fn test_invoice_number_uses_local_date() {
        // 20:00 UTC is already the next day in India.
        let paid_at = Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap();
        assert_eq!(
            invoice_number(7, paid_at.with_timezone(&ist())),
            "INV-20261020-00007"
        );
    }

    #[tokio::test]
    async fn test_create_pending_order() {
        let db = database().await;
        let order = db.orders().create(&NewOrder::default()).await.unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.tax_regime, TaxRegime::CgstSgst);
        assert_eq!(order.total_paise, 0);
        assert_eq!(order.invoice_number, None);
        assert_eq!(db.orders().active().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_items_keeps_totals_current() {
        let db = database().await;
        let repo = db.orders();
        let coffee = menu_item(&db, "Coffee", 5000, 500).await;
        let cake = menu_item(&db, "Cake", 3000, 1800).await;

        let order = repo.create(&NewOrder::default()).await.unwrap();
        repo.add_item(order.id, &line(coffee, "Coffee", 2, 5000, 500)).await.unwrap();
        repo.add_item(order.id, &line(cake, "Cake", 1, 3000, 1800)).await.unwrap();

        let order = repo.get(order.id).await.unwrap().unwrap();
        assert_eq!(order.subtotal_paise, 13000);
        assert_eq!(order.cgst_paise, 520);
        assert_eq!(order.sgst_paise, 520);
        assert_eq!(order.igst_paise, 0);
        assert_eq!(order.total_paise, 14040);
    }

    #[tokio::test]
    async fn test_same_menu_item_merges() {
        let db = database().await;
        let repo = db.orders();
        let coffee = menu_item(&db, "Coffee", 5000, 500).await;

        let order = repo.create(&NewOrder::default()).await.unwrap();
        let first = repo.add_item(order.id, &line(coffee, "Coffee", 1, 5000, 500)).await.unwrap();
        let merged = repo.add_item(order.id, &line(coffee, "Coffee", 2, 5000, 500)).await.unwrap();

        assert_eq!(first.id, merged.id);
        assert_eq!(merged.quantity, 3);
        assert_eq!(merged.total_price_paise, 15000);

        let with_note = line(coffee, "Coffee", 1, 5000, 500).with_notes(Some("no sugar".into()));
        repo.add_item(order.id, &with_note).await.unwrap();
        assert_eq!(repo.items(order.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_remove_lines() {
        let db = database().await;
        let repo = db.orders();
        let coffee = menu_item(&db, "Coffee", 5000, 500).await;

        let order = repo.create(&NewOrder::default()).await.unwrap();
        let item = repo.add_item(order.id, &line(coffee, "Coffee", 1, 5000, 500)).await.unwrap();

        let updated = repo.update_item_quantity(order.id, item.id, 4).await.unwrap().unwrap();
        assert_eq!(updated.total_price_paise, 20000);
        assert_eq!(repo.get(order.id).await.unwrap().unwrap().total_paise, 21000);

        assert!(repo.update_item_quantity(order.id, item.id, 0).await.unwrap().is_none());
        assert!(repo.items(order.id).await.unwrap().is_empty());
        assert_eq!(repo.get(order.id).await.unwrap().unwrap().total_paise, 0);

        let err = repo.remove_item(order.id, item.id).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ItemNotInOrder(_))));
    }

    #[tokio::test]
    async fn test_first_item_seats_table_and_finalize_frees_it() {
        let db = database().await;
        let repo = db.orders();
        let coffee = menu_item(&db, "Coffee", 5000, 500).await;
        let table_id = table(&db).await;

        let order = repo
            .create(&NewOrder {
                table_id: Some(table_id),
                ..NewOrder::default()
            })
            .await
            .unwrap();
        assert!(!db.tables().get(table_id).await.unwrap().unwrap().occupied);

        repo.add_item(order.id, &line(coffee, "Coffee", 2, 5000, 500)).await.unwrap();
        assert!(db.tables().get(table_id).await.unwrap().unwrap().occupied);

        repo.finalize(order.id, &pay(PaymentMethod::Cash), ist()).await.unwrap();
        assert!(!db.tables().get(table_id).await.unwrap().unwrap().occupied);
    }

    #[tokio::test]
    async fn test_finalize_freezes_order() {
        let db = database().await;
        let repo = db.orders();
        let coffee = menu_item(&db, "Coffee", 5000, 500).await;
        let cake = menu_item(&db, "Cake", 3000, 1800).await;

        let order = repo
            .create(&NewOrder {
                tax_regime: TaxRegime::Igst,
                ..NewOrder::default()
            })
            .await
            .unwrap();
        repo.add_item(order.id, &line(coffee, "Coffee", 2, 5000, 500)).await.unwrap();
        repo.add_item(order.id, &line(cake, "Cake", 1, 3000, 1800)).await.unwrap();

        let payment = FinalizeOrder {
            payment_method: PaymentMethod::Upi,
            customer: CustomerDetails {
                name: Some(" Asha ".to_string()),
                phone: None,
                gstin: Some("29aabct1332l1zt".to_string()),
            },
        };
        let paid = repo.finalize(order.id, &payment, ist()).await.unwrap();

        assert_eq!(paid.status, OrderStatus::Completed);
        assert_eq!(paid.payment_method, Some(PaymentMethod::Upi));
        assert_eq!(paid.igst_paise, 1040);
        assert_eq!(paid.cgst_paise + paid.sgst_paise, 0);
        assert_eq!(paid.total_paise, 14040);
        assert_eq!(paid.customer_name.as_deref(), Some("Asha"));
        assert_eq!(paid.customer_gstin.as_deref(), Some("29AABCT1332L1ZT"));
        assert!(paid.completed_at.is_some());

        let invoice = paid.invoice_number.unwrap();
        assert!(invoice.starts_with("INV-"));
        assert!(invoice.ends_with(&format!("-{:05}", order.id)));

        // Sold units leave stock.
        let coffee = db.menu().get_item(coffee).await.unwrap().unwrap();
        assert_eq!(coffee.stock_quantity, 18);

        // Paid orders are closed to edits and to a second payment.
        let err = repo
            .add_item(order.id, &line(cake, "Cake", 1, 3000, 1800))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidOrderStatus {
                current_status: OrderStatus::Completed,
                ..
            })
        ));
        assert!(repo.finalize(order.id, &pay(PaymentMethod::Cash), ist()).await.is_err());
        assert!(repo.active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_finalize_empty_order_rolls_back() {
        let db = database().await;
        let repo = db.orders();

        let order = repo.create(&NewOrder::default()).await.unwrap();
        let err = repo
            .finalize(order.id, &pay(PaymentMethod::Cash), ist())
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Domain(CoreError::EmptyOrder)));
        let order = repo.get(order.id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.invoice_number, None);
    }

    #[tokio::test]
    async fn test_prepare_then_cancel_frees_table() {
        let db = database().await;
        let repo = db.orders();
        let coffee = menu_item(&db, "Coffee", 5000, 500).await;
        let table_id = table(&db).await;

        let order = repo
            .create(&NewOrder {
                table_id: Some(table_id),
                ..NewOrder::default()
            })
            .await
            .unwrap();
        repo.add_item(order.id, &line(coffee, "Coffee", 1, 5000, 500)).await.unwrap();

        let preparing = repo.prepare(order.id).await.unwrap();
        assert_eq!(preparing.status, OrderStatus::Preparing);
        assert!(repo.prepare(order.id).await.is_err());

        // Still editable in the kitchen.
        repo.add_item(order.id, &line(coffee, "Coffee", 1, 5000, 500)).await.unwrap();

        let cancelled = repo.cancel(order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(!db.tables().get(table_id).await.unwrap().unwrap().occupied);
        assert!(repo.cancel(order.id).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_order() {
        let db = database().await;
        let err = db.orders().prepare(404).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::OrderNotFound(404))));
        assert!(db.orders().get(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_by_date_range_is_half_open() {
        let db = database().await;
        let repo = db.orders();
        let order = repo.create(&NewOrder::default()).await.unwrap();

        let around = DateRange::new(
            order.created_at - Duration::minutes(1),
            order.created_at + Duration::minutes(1),
        );
        assert_eq!(repo.by_date_range(&around).await.unwrap().len(), 1);

        let ending_at = DateRange::new(order.created_at - Duration::hours(1), order.created_at);
        assert!(repo.by_date_range(&ending_at).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quantity_limits() {
        let db = database().await;
        let repo = db.orders();
        let coffee = menu_item(&db, "Coffee", 5000, 500).await;
        let order = repo.create(&NewOrder::default()).await.unwrap();

        repo.add_item(order.id, &line(coffee, "Coffee", 990, 5000, 500)).await.unwrap();
        let err = repo
            .add_item(order.id, &line(coffee, "Coffee", 10, 5000, 500))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::QuantityTooLarge { requested: 1000, .. })
        ));

        assert!(repo
            .add_item(order.id, &line(coffee, "Coffee", 0, 5000, 500))
            .await
            .is_err());
    }
}
