//! # Sales Reports
//!
//! ```text
//! GET /reports/sales?period=weekly
//! GET /reports/sales?start_date=2026-10-01&end_date=2026-10-19
//! GET /reports/sales/print?period=monthly      (HTML)
//! ```
//!
//! Days are calendar days in the cafe's configured offset. Without dates
//! the period is counted back from today: `daily` is today, `weekly` the
//! last seven days, `monthly` the month so far.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use cafe_core::render::render_report;
use cafe_core::report::{DateRange, ReportPeriod, SalesReport};
use chrono::{Datelike, Days, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use super::{local_days, DateQuery};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/sales", get(sales))
        .route("/reports/sales/print", get(sales_print))
}

#[derive(Debug, Default, Deserialize)]
struct ReportQuery {
    #[serde(default)]
    period: Option<ReportPeriod>,
    #[serde(flatten)]
    dates: DateQuery,
}

impl ReportQuery {
    /// Explicit dates always win over `period` and make the report custom.
    fn resolve(&self, today: NaiveDate, tz: FixedOffset) -> ApiResult<(ReportPeriod, DateRange)> {
        if let Some(range) = self.dates.range(tz)? {
            return Ok((ReportPeriod::Custom, range));
        }

        let period = self.period.unwrap_or_default();
        let first = match period {
            ReportPeriod::Daily => today,
            ReportPeriod::Weekly => today - Days::new(6),
            ReportPeriod::Monthly => today.with_day(1).unwrap_or(today),
            ReportPeriod::Custom => {
                return Err(ApiError::validation(
                    "start_date or end_date is required for a custom report",
                ))
            }
        };

        Ok((period, local_days(first, today, tz)?))
    }
}

async fn build_report(state: &AppState, query: &ReportQuery) -> ApiResult<SalesReport> {
    let tz = state.config.utc_offset();
    let today = Utc::now().with_timezone(&tz).date_naive();
    let (period, range) = query.resolve(today, tz)?;
    debug!(%period, start = %range.start, end = %range.end, "Building sales report");

    let orders = state.db.orders().by_date_range(&range).await?;
    let expenses = state.db.expenses().by_date_range(&range).await?;

    Ok(SalesReport::build(period, range, &orders, &expenses))
}

async fn sales(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<SalesReport>> {
    Ok(Json(build_report(&state, &query).await?))
}

async fn sales_print(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<impl IntoResponse> {
    let report = build_report(&state, &query).await?;
    let cafe = state.cafe_info().await;
    let document = render_report(&report, &cafe, state.config.utc_offset(), Utc::now());

    Ok(([(header::CACHE_CONTROL, "no-store")], Html(document.html)))
}
