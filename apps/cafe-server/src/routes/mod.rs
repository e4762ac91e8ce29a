//! # HTTP Routes
//!
//! ```text
//! /health                          liveness check
//! /api
//!  ├── categories, menu-items      menu.rs
//!  ├── inventory                   inventory.rs
//!  ├── tables                      tables.rs
//!  ├── orders                      orders.rs     (items, finalize, receipt)
//!  ├── users                       users.rs
//!  ├── shifts                      shifts.rs
//!  ├── settings                    settings.rs
//!  ├── expenses                    expenses.rs
//!  └── reports                     reports.rs    (JSON + printable HTML)
//! ```

mod expenses;
mod inventory;
mod menu;
mod orders;
mod reports;
mod settings;
mod shifts;
mod tables;
mod users;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use cafe_core::report::DateRange;
use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(menu::routes())
        .merge(inventory::routes())
        .merge(tables::routes())
        .merge(orders::routes())
        .merge(users::routes())
        .merge(shifts::routes())
        .merge(settings::routes())
        .merge(expenses::routes())
        .merge(reports::routes());

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        .with_state(state)
}

/// Health check: 200 while the database answers, 503 otherwise.
async fn health_handler(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.db.health_check().await {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "DATABASE UNAVAILABLE")
    }
}

// =============================================================================
// Date Query
// =============================================================================

/// `?start_date=2026-10-01&end_date=2026-10-19`, both inclusive calendar
/// days in the cafe's local time.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DateQuery {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl DateQuery {
    /// The half-open UTC range covering the requested days. A missing
    /// bound takes the value of the other one.
    pub fn range(&self, tz: FixedOffset) -> ApiResult<Option<DateRange>> {
        let (first, last) = match (self.start_date, self.end_date) {
            (None, None) => return Ok(None),
            (Some(day), None) | (None, Some(day)) => (day, day),
            (Some(start), Some(end)) => (start, end),
        };

        if last < first {
            return Err(ApiError::validation("end_date must not be before start_date"));
        }

        Ok(Some(local_days(first, last, tz)?))
    }
}

/// `[first 00:00, last + 1 day 00:00)` in `tz`, as UTC.
pub(crate) fn local_days(first: NaiveDate, last: NaiveDate, tz: FixedOffset) -> ApiResult<DateRange> {
    let after_last = last
        .checked_add_days(Days::new(1))
        .ok_or_else(|| ApiError::validation("end_date out of range"))?;

    Ok(DateRange::new(
        local_midnight(first, tz)?,
        local_midnight(after_last, tz)?,
    ))
}

fn local_midnight(day: NaiveDate, tz: FixedOffset) -> ApiResult<DateTime<Utc>> {
    day.and_time(NaiveTime::MIN)
        .and_local_timezone(tz)
        .single()
        .map(|at| at.with_timezone(&Utc))
        .ok_or_else(|| ApiError::validation(format!("{} is out of range", day)))
}
