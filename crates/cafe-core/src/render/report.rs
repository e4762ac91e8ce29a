//! A4 sales report.

use chrono::{DateTime, Duration, FixedOffset, Utc};

use super::format::{escape_html, format_date, format_date_time, format_inr, format_percentage};
use super::{page, Document, DocumentKind};
use crate::report::SalesReport;
use crate::settings::CafeInfo;

const REPORT_STYLE: &str = "\
@page { size: A4; margin: 15mm; }
body { font-family: Arial, Helvetica, sans-serif; font-size: 12px; color: #222; margin: 0; }
.header { text-align: center; border-bottom: 2px solid #333; padding-bottom: 10px; margin-bottom: 20px; }
.header h1 { margin: 0; font-size: 22px; }
.header h2 { margin: 6px 0 0; font-size: 16px; font-weight: normal; }
.summary { display: flex; gap: 12px; margin-bottom: 24px; }
.card { flex: 1; border: 1px solid #ccc; border-radius: 4px; padding: 10px; }
.card .label { font-size: 11px; color: #666; }
.card .value { font-size: 18px; font-weight: bold; margin-top: 4px; }
h3 { font-size: 14px; margin: 20px 0 8px; }
table { width: 100%; border-collapse: collapse; }
th, td { border: 1px solid #ddd; padding: 6px 8px; text-align: left; }
th { background: #f2f2f2; }
td.num, th.num { text-align: right; }
.empty { color: #666; font-style: italic; }
.footer { margin-top: 30px; text-align: center; font-size: 10px; color: #666; }
";

/// Renders the printable sales report.
///
/// The average order value and payment-method shares are guarded: with no
/// orders or no sales they print as `₹0.00` and `0.00%`.
pub fn render_report(
    report: &SalesReport,
    cafe: &CafeInfo,
    tz: FixedOffset,
    generated_at: DateTime<Utc>,
) -> Document {
    let from = format_date(report.range.start, tz);
    let to = format_date(last_instant(report.range.start, report.range.end), tz);
    let title = format!("Sales Report: {} to {}", from, to);
    let mut body = String::new();

    body.push_str("<div class=\"header\">\n");
    body.push_str(&format!("<h1>{}</h1>\n", escape_html(&cafe.name)));
    body.push_str(&format!(
        "<h2>{} Report: {} to {}</h2>\n",
        report.period.label(),
        from,
        to
    ));
    body.push_str("</div>\n");

    body.push_str("<div class=\"summary\">\n");
    let cards = [
        ("Total Sales", format_inr(report.total_sales)),
        ("Total Orders", report.total_orders.to_string()),
        ("Average Order Value", format_inr(report.average_order_value)),
        ("Total Tax Collected", format_inr(report.total_tax)),
    ];
    for (label, value) in cards {
        body.push_str(&format!(
            "<div class=\"card\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>\n",
            label, value
        ));
    }
    body.push_str("</div>\n");

    body.push_str("<h3>Payment Method Breakdown</h3>\n");
    if report.sales_by_payment_method.is_empty() {
        body.push_str("<p class=\"empty\">No payments recorded.</p>\n");
    } else {
        body.push_str(
            "<table>\n<thead><tr><th>Payment Method</th><th class=\"num\">Amount</th>\
             <th class=\"num\">Percentage</th></tr></thead>\n<tbody>\n",
        );
        for entry in &report.sales_by_payment_method {
            body.push_str(&format!(
                "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>\n",
                escape_html(&entry.name),
                format_inr(entry.value),
                format_percentage(report.sales_share(entry.value)),
            ));
        }
        body.push_str("</tbody>\n</table>\n");
    }

    body.push_str("<h3>Orders</h3>\n");
    if report.orders.is_empty() {
        body.push_str("<p class=\"empty\">No orders in this period.</p>\n");
    } else {
        body.push_str(
            "<table>\n<thead><tr><th>Invoice #</th><th>Date</th><th>Customer</th>\
             <th>Payment Method</th><th class=\"num\">Amount</th></tr></thead>\n<tbody>\n",
        );
        for order in &report.orders {
            let customer = order
                .customer_name
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or("Walk-in");
            let method = order.payment_method.map(|m| m.label()).unwrap_or("N/A");
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td></tr>\n",
                escape_html(&order.display_number()),
                format_date_time(order.created_at, tz),
                escape_html(customer),
                method,
                format_inr(order.total),
            ));
        }
        body.push_str("</tbody>\n</table>\n");
    }

    body.push_str("<div class=\"footer\">\n");
    body.push_str(&format!(
        "<p>Generated on {}</p>\n",
        format_date_time(generated_at, tz)
    ));
    body.push_str(&format!("<p>{} POS System</p>\n", escape_html(&cafe.name)));
    body.push_str("</div>\n");

    Document {
        kind: DocumentKind::Report,
        html: page(&title, REPORT_STYLE, &body),
        title,
    }
}

/// Last instant inside a half-open range, for printing its closing date.
fn last_instant(start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    if end > start {
        end - Duration::seconds(1)
    } else {
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{DateRange, ReportPeriod};
    use crate::types::{Order, OrderStatus, PaymentMethod, TaxRegime};
    use chrono::TimeZone;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    fn day() -> DateRange {
        // 19 Oct 2026 00:00 IST
        let start = Utc.with_ymd_and_hms(2026, 10, 18, 18, 30, 0).unwrap();
        DateRange::new(start, start + Duration::days(1))
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 15, 0, 0).unwrap()
    }

    fn order(id: i64, total_paise: i64, method: PaymentMethod, customer: Option<&str>) -> Order {
        Order {
            id,
            table_id: None,
            user_id: None,
            status: OrderStatus::Completed,
            tax_regime: TaxRegime::CgstSgst,
            subtotal_paise: total_paise,
            cgst_paise: 0,
            sgst_paise: 0,
            igst_paise: 0,
            total_paise,
            payment_method: Some(method),
            customer_name: customer.map(str::to_string),
            customer_phone: None,
            customer_gstin: None,
            invoice_number: (id == 1).then(|| "INV-20261019-00001".to_string()),
            created_at: Utc.with_ymd_and_hms(2026, 10, 19, 4, 30, 0).unwrap(),
            completed_at: None,
        }
    }

    #[test]
    fn test_empty_report_is_guarded() {
        let report = SalesReport::build(ReportPeriod::Daily, day(), &[], &[]);
        let doc = render_report(&report, &CafeInfo::default(), ist(), generated_at());

        assert_eq!(doc.kind, DocumentKind::Report);
        assert_eq!(doc.title, "Sales Report: 19 Oct 2026 to 19 Oct 2026");
        assert!(doc.html.contains("<h2>Daily Report: 19 Oct 2026 to 19 Oct 2026</h2>"));
        assert!(doc.html.contains(
            "<div class=\"label\">Average Order Value</div><div class=\"value\">₹0.00</div>"
        ));
        assert!(doc.html.contains(
            "<div class=\"label\">Total Orders</div><div class=\"value\">0</div>"
        ));
        assert!(doc.html.contains("No orders in this period."));
        assert!(!doc.html.contains("NaN"));
        assert!(doc.html.contains("Generated on 19 Oct 2026 08:30 pm"));
    }

    #[test]
    fn test_report_rows_and_percentages() {
        let orders = vec![
            order(1, 30_000, PaymentMethod::Cash, Some("Ravi")),
            order(2, 10_000, PaymentMethod::Upi, None),
            order(3, 123_456_78, PaymentMethod::Upi, Some("  ")),
        ];
        let report = SalesReport::build(ReportPeriod::Custom, day(), &orders, &[]);
        let doc = render_report(&report, &CafeInfo::default(), ist(), generated_at());

        assert!(doc.html.contains("<h2>Custom Report:"));
        assert!(doc.html.contains("<td>INV-20261019-00001</td>"));
        assert!(doc.html.contains("<td>#2</td>"));
        assert!(doc.html.contains("<td>Ravi</td>"));
        assert_eq!(doc.html.matches("<td>Walk-in</td>").count(), 2);
        assert!(doc.html.contains("<td class=\"num\">₹1,23,456.78</td>"));
        assert!(doc.html.contains("<td>19 Oct 2026 10:00 am</td>"));
        assert!(doc.html.contains("Payment Method Breakdown"));
        assert!(doc.html.contains("<td>Cash</td><td class=\"num\">₹300.00</td>"));
    }

    #[test]
    fn test_zero_sales_share_prints_zero_percent() {
        let orders = vec![order(1, 0, PaymentMethod::Card, None)];
        let report = SalesReport::build(ReportPeriod::Daily, day(), &orders, &[]);
        let doc = render_report(&report, &CafeInfo::default(), ist(), generated_at());

        assert!(doc.html.contains("<td>Card</td><td class=\"num\">₹0.00</td><td class=\"num\">0.00%</td>"));
    }
}
