//! Common types used across the console

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Identifiers are the external API's integer primary keys.
pub type CategoryId = i64;
pub type MaterialId = i64;
pub type WarehouseId = i64;
pub type SupplierId = i64;
pub type ClientId = i64;
pub type DocumentId = i64;

/// Document-level default currency
pub const DEFAULT_CURRENCY: &str = "UAH";

/// Currencies offered by the currency selector
pub const SUPPORTED_CURRENCIES: &[&str] = &[
    "UAH", "USD", "EUR", "PLN", "GBP", "CHF", "CZK", "HUF", "RON",
];

/// Parse a form field into a quantity or price, treating blank or
/// non-numeric input as zero. Form state keeps raw strings; arithmetic
/// on them must never fail or produce NaN.
pub fn decimal_or_zero(raw: &str) -> Decimal {
    Decimal::from_str(raw.trim()).unwrap_or(Decimal::ZERO)
}

/// Parse an optional form field, returning `None` for blank input and
/// for input that does not parse.
pub fn decimal_or_none(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Parse a select value into an id. Empty string means "nothing chosen".
pub fn id_or_none(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Deserialize a timestamp leniently: a missing, null or unparseable
/// value becomes `None` instead of failing the whole response. Records
/// without a usable timestamp fall outside every reporting window.
pub fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_datetime))
}

/// Parse the timestamp formats the external API emits: RFC 3339 with or
/// without an offset (naive timestamps are taken as UTC).
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a monetary amount the way the console renders it (two decimal
/// places, no thousands separators).
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

/// Date range for report queries, inclusive on both ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub from: chrono::NaiveDate,
    pub to: chrono::NaiveDate,
}
