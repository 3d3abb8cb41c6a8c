//! Typed values resolved out of export rows.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single report record. Shape is defined by the caller.
pub type ExportRow = serde_json::Map<String, Value>;

/// How a field should be interpreted when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Infer from the value: ISO timestamps become dates, numeric
    /// `*amount*` fields become currency.
    #[default]
    Auto,
    /// Render verbatim, no inference.
    Text,
    /// Plain number.
    Number,
    /// USD currency.
    Currency,
    /// Timestamp.
    Date,
}

/// Value found at a field path.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(DateTime<Utc>),
    List(Vec<FieldValue>),
    Object(serde_json::Map<String, Value>),
}

impl FieldValue {
    /// Convert a JSON value using the given interpretation.
    pub fn from_json(value: &Value, kind: FieldKind) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => {
                let n = n.as_f64().unwrap_or(f64::NAN);
                match kind {
                    FieldKind::Date => millis_to_date(n)
                        .map(FieldValue::Date)
                        .unwrap_or(FieldValue::Number(n)),
                    _ => FieldValue::Number(n),
                }
            }
            Value::String(s) => match kind {
                FieldKind::Text => FieldValue::Text(s.clone()),
                FieldKind::Auto => parse_timestamp(s)
                    .map(FieldValue::Date)
                    .unwrap_or_else(|| FieldValue::Text(s.clone())),
                FieldKind::Date => parse_timestamp(s)
                    .or_else(|| parse_calendar_date(s))
                    .map(FieldValue::Date)
                    .unwrap_or_else(|| FieldValue::Text(s.clone())),
                FieldKind::Number | FieldKind::Currency => s
                    .trim()
                    .parse::<f64>()
                    .map(FieldValue::Number)
                    .unwrap_or_else(|_| FieldValue::Text(s.clone())),
            },
            Value::Array(items) => {
                FieldValue::List(items.iter().map(|v| FieldValue::from_json(v, kind)).collect())
            }
            Value::Object(map) => FieldValue::Object(map.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Plain string form, without currency formatting.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Date(d) => format_date(d),
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::display)
                .collect::<Vec<_>>()
                .join(","),
            FieldValue::Object(map) => {
                serde_json::to_string(map).unwrap_or_default()
            }
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_calendar_date(s: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

fn millis_to_date(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms as i64)
}

/// `Jan 5, 2024, 09:30` (UTC, 24h clock).
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y, %H:%M").to_string()
}

/// Integral values print without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// USD currency with thousands separators: `$1,234.50`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format_number(amount);
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}${}.{:02}",
        sign,
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(",")
}
