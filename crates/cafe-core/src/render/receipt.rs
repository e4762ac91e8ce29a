//! 80mm thermal receipt.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │         Coffee Haven         │
//! │ 123 Coffee Street, Bangalore │
//! │    GSTIN: 29AABCT1332L1ZT    │
//! │ Invoice #: INV-20261019-00042│
//! │ Date: 19 Oct 2026 02:30 pm   │
//! │ Item        Qty Price  Total │
//! │ Masala Chai   2 ₹50.00 ₹100.00│
//! │ Subtotal            ₹100.00  │
//! │ CGST (2.5%)           ₹2.50  │
//! │ SGST (2.5%)           ₹2.50  │
//! │ Total               ₹105.00  │
//! │ Payment Method: UPI          │
//! │ Tax Invoice under GST Act 2017│
//! └──────────────────────────────┘
//! ```

use chrono::{DateTime, FixedOffset, Utc};

use super::format::{escape_html, format_amount, format_date_time};
use super::{page, Document, DocumentKind, LEGAL_FOOTER};
use crate::gst::TaxBreakdown;
use crate::money::Money;
use crate::order::{uniform_rate, CustomerDetails, LineItem};
use crate::settings::CafeInfo;
use crate::types::{Order, OrderItem, PaymentMethod, TaxRegime};

const RECEIPT_STYLE: &str = "\
@page { size: 80mm auto; margin: 0; }
body { font-family: 'Courier New', Courier, monospace; font-size: 12px; margin: 0; padding: 4mm; width: 72mm; color: #000; }
.header { text-align: center; margin-bottom: 8px; }
.header h1 { font-size: 16px; margin: 0 0 4px; }
.header p, .info p, .footer p { margin: 2px 0; }
.info { border-top: 1px dashed #000; border-bottom: 1px dashed #000; padding: 4px 0; margin-bottom: 6px; }
table { width: 100%; border-collapse: collapse; }
th { text-align: left; border-bottom: 1px dashed #000; }
td.num, th.num { text-align: right; }
.totals { border-top: 1px dashed #000; margin-top: 6px; padding-top: 4px; }
.row { display: flex; justify-content: space-between; }
.grand { font-weight: bold; font-size: 14px; border-top: 1px dashed #000; margin-top: 4px; padding-top: 4px; }
.payment { margin-top: 6px; }
.footer { text-align: center; margin-top: 10px; border-top: 1px dashed #000; padding-top: 6px; }
";

/// What a receipt needs to know about an order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptOrder {
    pub id: i64,
    pub invoice_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub customer: CustomerDetails,
    pub regime: TaxRegime,
    pub items: Vec<LineItem>,
}

impl ReceiptOrder {
    pub fn from_order(order: &Order, items: &[OrderItem]) -> Self {
        ReceiptOrder {
            id: order.id,
            invoice_number: order.invoice_number.clone(),
            created_at: order.created_at,
            customer: CustomerDetails {
                name: order.customer_name.clone(),
                phone: order.customer_phone.clone(),
                gstin: order.customer_gstin.clone(),
            },
            regime: order.tax_regime,
            items: items.iter().map(LineItem::from).collect(),
        }
    }

    /// Invoice number when assigned, otherwise `#<id>`.
    pub fn display_number(&self) -> String {
        match &self.invoice_number {
            Some(invoice) if !invoice.is_empty() => invoice.clone(),
            _ => format!("#{}", self.id),
        }
    }
}

/// Renders the customer receipt for a finalized order.
///
/// `breakdown` is printed as given; callers pass the order's frozen totals.
/// Customer lines appear only for the details that are present.
pub fn render_receipt(
    order: &ReceiptOrder,
    breakdown: &TaxBreakdown,
    payment_method: PaymentMethod,
    cafe: &CafeInfo,
    tz: FixedOffset,
) -> Document {
    let number = order.display_number();
    let title = format!("Receipt {}", number);
    let mut body = String::new();

    body.push_str("<div class=\"receipt\">\n<div class=\"header\">\n");
    body.push_str(&format!("<h1>{}</h1>\n", escape_html(&cafe.name)));
    body.push_str(&format!("<p>{}</p>\n", escape_html(&cafe.address)));
    body.push_str(&format!("<p>GSTIN: {}</p>\n", escape_html(&cafe.gstin)));
    if let Some(phone) = &cafe.phone {
        body.push_str(&format!("<p>Phone: {}</p>\n", escape_html(phone)));
    }
    body.push_str("</div>\n");

    body.push_str("<div class=\"info\">\n");
    body.push_str(&format!("<p>Invoice #: {}</p>\n", escape_html(&number)));
    body.push_str(&format!(
        "<p>Date: {}</p>\n",
        format_date_time(order.created_at, tz)
    ));
    let customer_lines = [
        ("Customer", &order.customer.name),
        ("Phone", &order.customer.phone),
        ("GSTIN", &order.customer.gstin),
    ];
    for (label, value) in customer_lines {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            body.push_str(&format!("<p>{}: {}</p>\n", label, escape_html(value)));
        }
    }
    body.push_str("</div>\n");

    body.push_str(
        "<table class=\"items\">\n<thead><tr><th>Item</th><th class=\"num\">Qty</th>\
         <th class=\"num\">Price</th><th class=\"num\">Total</th></tr></thead>\n<tbody>\n",
    );
    for item in &order.items {
        body.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>\n",
            escape_html(&item.name),
            item.quantity,
            format_amount(item.unit_price),
            format_amount(item.total_price()),
        ));
    }
    body.push_str("</tbody>\n</table>\n");

    body.push_str("<div class=\"totals\">\n");
    body.push_str(&total_row("Subtotal", breakdown.subtotal, ""));
    let rate = uniform_rate(&order.items);
    match order.regime {
        TaxRegime::CgstSgst => {
            let label = rate.map(|r| format!(" ({}%)", r.half_percentage()));
            let label = label.as_deref().unwrap_or("");
            body.push_str(&total_row(&format!("CGST{}", label), breakdown.cgst, ""));
            body.push_str(&total_row(&format!("SGST{}", label), breakdown.sgst, ""));
        }
        TaxRegime::Igst => {
            let label = rate.map(|r| format!(" ({}%)", r.percentage()));
            let label = label.as_deref().unwrap_or("");
            body.push_str(&total_row(&format!("IGST{}", label), breakdown.igst, ""));
        }
    }
    body.push_str(&total_row("Total", breakdown.total, " grand"));
    body.push_str("</div>\n");

    body.push_str(&format!(
        "<p class=\"payment\">Payment Method: {}</p>\n",
        payment_method.as_str().to_uppercase()
    ));

    body.push_str("<div class=\"footer\">\n");
    body.push_str(&format!("<p>{}</p>\n", LEGAL_FOOTER));
    body.push_str(&format!("<p>{}</p>\n", escape_html(&cafe.footer)));
    body.push_str(&format!("<p>Powered by {} POS</p>\n", escape_html(&cafe.name)));
    body.push_str("</div>\n</div>\n");

    Document {
        kind: DocumentKind::Receipt,
        html: page(&title, RECEIPT_STYLE, &body),
        title,
    }
}

fn total_row(label: &str, amount: Money, class: &str) -> String {
    format!(
        "<div class=\"row{}\"><span>{}</span><span>{}</span></div>\n",
        class,
        label,
        format_amount(amount)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gst::compute_tax;
    use crate::order::aggregate;
    use crate::types::TaxRate;
    use chrono::TimeZone;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    fn receipt_order(regime: TaxRegime) -> ReceiptOrder {
        ReceiptOrder {
            id: 42,
            invoice_number: None,
            created_at: Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
            customer: CustomerDetails::default(),
            regime,
            items: vec![LineItem::new(
                "Masala Chai",
                2,
                Money::from_rupees(50),
                TaxRate::from_bps(500),
            )],
        }
    }

    #[test]
    fn test_receipt_split_regime() {
        let order = receipt_order(TaxRegime::CgstSgst);
        let breakdown = aggregate(&order.items, order.regime).rounded();
        let doc = render_receipt(&order, &breakdown, PaymentMethod::Upi, &CafeInfo::default(), ist());

        assert_eq!(doc.kind, DocumentKind::Receipt);
        assert_eq!(doc.title, "Receipt #42");
        assert!(doc.html.contains("<h1>Coffee Haven</h1>"));
        assert!(doc.html.contains("GSTIN: 29AABCT1332L1ZT"));
        assert!(doc.html.contains("Invoice #: #42"));
        assert!(doc.html.contains("Date: 19 Oct 2026 02:30 pm"));
        assert!(doc.html.contains("<td>Masala Chai</td><td class=\"num\">2</td>"));
        assert!(doc.html.contains("<span>Subtotal</span><span>₹100.00</span>"));
        assert!(doc.html.contains("<span>CGST (2.5%)</span><span>₹2.50</span>"));
        assert!(doc.html.contains("<span>SGST (2.5%)</span><span>₹2.50</span>"));
        assert!(doc.html.contains("<span>Total</span><span>₹105.00</span>"));
        assert!(!doc.html.contains("IGST"));
        assert!(doc.html.contains("Payment Method: UPI"));
        assert!(doc.html.contains(LEGAL_FOOTER));
        assert!(doc.html.contains("Thank you for visiting!"));
    }

    #[test]
    fn test_receipt_igst_and_invoice_number() {
        let mut order = receipt_order(TaxRegime::Igst);
        order.invoice_number = Some("INV-20261019-00042".to_string());
        let breakdown = compute_tax(Money::from_rupees(100), TaxRate::from_bps(500), TaxRegime::Igst);
        let doc = render_receipt(&order, &breakdown, PaymentMethod::Cash, &CafeInfo::default(), ist());

        assert!(doc.html.contains("Invoice #: INV-20261019-00042"));
        assert!(doc.html.contains("<span>IGST (5%)</span><span>₹5.00</span>"));
        assert!(!doc.html.contains("CGST"));
        assert!(doc.html.contains("Payment Method: CASH"));
    }

    #[test]
    fn test_customer_lines_only_when_present() {
        let mut order = receipt_order(TaxRegime::CgstSgst);
        let breakdown = aggregate(&order.items, order.regime);

        let doc = render_receipt(&order, &breakdown, PaymentMethod::Card, &CafeInfo::default(), ist());
        assert!(!doc.html.contains("Customer:"));

        order.customer = CustomerDetails {
            name: Some("Asha <VIP>".to_string()),
            phone: None,
            gstin: Some("27AAACR5055K1Z7".to_string()),
        };
        let doc = render_receipt(&order, &breakdown, PaymentMethod::Card, &CafeInfo::default(), ist());
        assert!(doc.html.contains("<p>Customer: Asha &lt;VIP&gt;</p>"));
        assert!(!doc.html.contains("Phone:"));
        assert!(doc.html.contains("<p>GSTIN: 27AAACR5055K1Z7</p>"));
    }

    #[test]
    fn test_cafe_phone_printed_only_when_set() {
        let order = receipt_order(TaxRegime::CgstSgst);
        let breakdown = aggregate(&order.items, order.regime);

        let doc = render_receipt(&order, &breakdown, PaymentMethod::Cash, &CafeInfo::default(), ist());
        assert!(!doc.html.contains("Phone:"));

        let cafe = CafeInfo {
            phone: Some("080 4110 2200".to_string()),
            ..CafeInfo::default()
        };
        let doc = render_receipt(&order, &breakdown, PaymentMethod::Cash, &cafe, ist());
        assert!(doc.html.contains("<p>Phone: 080 4110 2200</p>"));
    }

    #[test]
    fn test_mixed_rates_print_bare_labels() {
        let mut order = receipt_order(TaxRegime::CgstSgst);
        order.items.push(LineItem::new(
            "Cold Coffee",
            1,
            Money::from_rupees(30),
            TaxRate::from_bps(1800),
        ));
        let breakdown = aggregate(&order.items, order.regime).rounded();
        let doc = render_receipt(&order, &breakdown, PaymentMethod::Cash, &CafeInfo::default(), ist());

        assert!(doc.html.contains("<span>CGST</span><span>₹5.20</span>"));
        assert!(doc.html.contains("<span>Total</span><span>₹140.40</span>"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let order = receipt_order(TaxRegime::CgstSgst);
        let breakdown = aggregate(&order.items, order.regime);
        let a = render_receipt(&order, &breakdown, PaymentMethod::Upi, &CafeInfo::default(), ist());
        let b = render_receipt(&order, &breakdown, PaymentMethod::Upi, &CafeInfo::default(), ist());
        assert_eq!(a, b);
    }
}
