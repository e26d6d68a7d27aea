//! Shared rendering helpers for command handlers.

use chrono::{DateTime, Utc};
use invdash_upstream::{EmptyReason, Fetched, Shape};

/// Turn a service outcome into something a command can print.
///
/// `Data` and `Partial` yield the payload (the latter with a warning on
/// stderr), `Empty` prints why there is nothing to show and yields `None`,
/// and `Failed` becomes an error.
///
/// # Errors
///
/// Returns the upstream error for `Fetched::Failed`.
pub(crate) fn settle<T>(what: &str, fetched: Fetched<T>) -> anyhow::Result<Option<T>> {
    match fetched {
        Fetched::Data(data) => Ok(Some(data)),
        Fetched::Partial { data, error } => {
            tracing::warn!(error = %error, "{what} is incomplete");
            eprintln!("warning: {what} is incomplete: {error}");
            Ok(Some(data))
        }
        Fetched::Empty(reason) => {
            println!("{}", empty_message(what, reason));
            Ok(None)
        }
        Fetched::Failed(error) => {
            Err(anyhow::Error::new(error).context(format!("failed to load {what}")))
        }
    }
}

pub(crate) fn empty_message(what: &str, reason: EmptyReason) -> String {
    match reason {
        EmptyReason::NotConfigured => format!(
            "no {what}: upstream is not configured; set INVDASH_UPSTREAM_BASE_URL and INVDASH_UPSTREAM_TOKEN"
        ),
        EmptyReason::NoRecords => format!("no {what} found"),
        EmptyReason::UnrecognizedShape => {
            format!("no {what}: upstream response had an unrecognized shape")
        }
    }
}

pub(crate) fn fmt_shape(shape: Shape) -> String {
    match shape {
        Shape::Array => "bare array".to_string(),
        Shape::Keyed(key) => format!("object keyed by `{key}`"),
        Shape::Unrecognized => "unrecognized".to_string(),
    }
}

/// Whole quantities print without decimals.
pub(crate) fn fmt_qty(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

pub(crate) fn fmt_money(value: f64) -> String {
    format!("{value:.2}")
}

pub(crate) fn fmt_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || "\u{2014}".to_string(),
        |at| at.format("%Y-%m-%d %H:%M").to_string(),
    )
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}
