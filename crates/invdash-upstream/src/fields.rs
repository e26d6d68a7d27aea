//! Field resolution policies for upstream records.
//!
//! The upstream API names the same datum differently across endpoints and
//! versions (`availableQuantity`, `avaiableQuantity`, `stock`, ...). Each
//! canonical field therefore gets a [`FieldPolicy`]: an ordered list of
//! candidate paths tried until one yields a value. The tables live next to
//! the code that uses them ([`crate::normalize`], [`crate::reconcile`]) so the
//! priority order is visible and testable per field.
//!
//! Two lookup semantics are provided:
//! - numbers and flags stop at the first candidate that is present and not
//!   `null`, then coerce it (a present-but-garbage value does not fall
//!   through to later candidates);
//! - text skips candidates that are blank or not text-like, so an embedded
//!   `category` object does not shadow a later `categoryName` string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// A path of object keys, e.g. `&["supplier", "name"]`.
pub type FieldPath = &'static [&'static str];

/// Ordered candidate paths for one canonical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldPolicy {
    /// Canonical field name, for logs and test messages.
    pub field: &'static str,
    pub candidates: &'static [FieldPath],
}

impl FieldPolicy {
    /// First candidate that is present and not `null`.
    #[must_use]
    pub fn lookup<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.candidates
            .iter()
            .filter_map(|path| walk(record, path))
            .find(|value| !value.is_null())
    }

    /// Numeric value of the first present candidate.
    #[must_use]
    pub fn number(&self, record: &Value) -> Option<f64> {
        self.lookup(record).and_then(coerce_number)
    }

    /// First candidate that renders as non-blank text.
    #[must_use]
    pub fn text(&self, record: &Value) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|path| walk(record, path))
            .find_map(coerce_text)
    }

    /// Boolean value of the first present candidate.
    #[must_use]
    pub fn flag(&self, record: &Value) -> Option<bool> {
        self.lookup(record).and_then(coerce_flag)
    }

    /// Timestamp parsed from the first candidate that holds one.
    #[must_use]
    pub fn timestamp(&self, record: &Value) -> Option<DateTime<Utc>> {
        self.candidates
            .iter()
            .filter_map(|path| walk(record, path))
            .find_map(coerce_timestamp)
    }
}

fn walk<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(record, |node, key| node.get(*key))
}

/// Coerces a JSON value into a finite number.
///
/// Accepts numbers and numeric strings. A string using a comma as its only
/// decimal separator (`"12,50"`) is read as a decimal. Blank strings,
/// booleans, and anything non-finite yield `None`.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed.contains(',') && !trimmed.contains('.') {
                trimmed.replace(',', ".").parse::<f64>().ok()?
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Coerces a JSON value into non-blank text. Integral numbers render
/// without a fractional part so numeric ids stay stable.
#[must_use]
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => Some(
            n.as_i64()
                .map(|i| i.to_string())
                .or_else(|| n.as_u64().map(|u| u.to_string()))
                .unwrap_or_else(|| n.to_string()),
        ),
        _ => None,
    }
}

#[must_use]
pub fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match fold_key(s).as_str() {
            "true" | "1" | "sim" | "s" | "yes" | "y" => Some(true),
            "false" | "0" | "nao" | "n" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Parses RFC 3339, `YYYY-MM-DD HH:MM:SS`, bare dates, and epoch numbers
/// (milliseconds when larger than 10^11, seconds otherwise). Naive values
/// are taken as UTC.
#[must_use]
pub fn coerce_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s.trim()),
        Value::Number(n) => {
            let raw = n.as_i64()?;
            if raw.unsigned_abs() > 100_000_000_000 {
                Utc.timestamp_millis_opt(raw).single()
            } else {
                Utc.timestamp_opt(raw, 0).single()
            }
        }
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Lowercases and strips Portuguese diacritics so `"SAÍDA"` and `"saida"`
/// compare equal.
#[must_use]
pub fn fold_key(s: &str) -> String {
    s.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}
