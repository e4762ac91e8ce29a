//! Text formatting shared by the receipt and report templates.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::money::Money;
use crate::CURRENCY_SYMBOL;

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Receipt style amount: `₹1234.50`.
pub fn format_amount(amount: Money) -> String {
    amount.to_string()
}

/// Report style amount with Indian digit grouping: `₹1,23,456.78`.
pub fn format_inr(amount: Money) -> String {
    let rounded = amount.rounded();
    let text = format!("{:.2}", rounded.amount().abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_negative() { "-" } else { "" };
    format!("{}{}{}.{}", sign, CURRENCY_SYMBOL, group_indian(whole), fraction)
}

/// Groups the last three digits, then pairs: `1234567` → `12,34,567`.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let split = rest.len() - 2;
        groups.push(&rest[split..]);
        rest = &rest[..split];
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Percentage with two decimals: `33.33%`.
pub fn format_percentage(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}%", rounded)
}

/// Short date in the cafe's offset: `19 Oct 2026`.
pub fn format_date(at: DateTime<Utc>, tz: FixedOffset) -> String {
    at.with_timezone(&tz).format("%d %b %Y").to_string()
}

/// Short time in the cafe's offset: `02:30 pm`.
pub fn format_time(at: DateTime<Utc>, tz: FixedOffset) -> String {
    at.with_timezone(&tz)
        .format("%I:%M %p")
        .to_string()
        .to_lowercase()
}

/// `19 Oct 2026 02:30 pm`.
pub fn format_date_time(at: DateTime<Utc>, tz: FixedOffset) -> String {
    format!("{} {}", format_date(at, tz), format_time(at, tz))
}
