//! Lenient coercions for loosely-typed actor output.
//!
//! Every function here accepts a raw [`Value`] and returns `None` (or `0` for
//! counts) instead of failing when the value has an unexpected shape.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// True for values the field cascade treats as absent: `null`, `false`, `0`,
/// empty strings, empty arrays and empty objects.
#[must_use]
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Parse an engagement counter such as `12`, `"35,369"`, or `"1 204.0"`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, ',' | ' ' | '\u{a0}' | '_'))
                .collect();
            let integral = cleaned.split('.').next().unwrap_or_default();
            integral.parse::<i64>().ok()
        }
        _ => None,
    }
}

/// [`parse_count`] with a default of `0`.
#[must_use]
pub fn coerce_count(value: &Value) -> i64 {
    parse_count(value).unwrap_or(0)
}

/// Parse a duration given as seconds (`45`, `45.9`, `"45"`) or as a clock
/// string (`"01:02:03"`, `"02:03"`).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_duration(value: &Value) -> Option<u32> {
    if is_falsy(value) {
        return None;
    }
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|secs| u32::try_from(secs).ok())
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && *f <= f64::from(u32::MAX))
                    .map(|f| f.trunc() as u32)
            }),
        Value::String(s) => parse_duration_str(s.trim()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_duration_str(s: &str) -> Option<u32> {
    if s.contains(':') {
        let parts: Option<Vec<u32>> = s.split(':').map(|p| p.trim().parse::<u32>().ok()).collect();
        return match parts?.as_slice() {
            [h, m, sec] => h
                .checked_mul(3600)?
                .checked_add(m.checked_mul(60)?)?
                .checked_add(*sec),
            [m, sec] => m.checked_mul(60)?.checked_add(*sec),
            _ => None,
        };
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= 0.0 && *f <= f64::from(u32::MAX))
        .map(|f| f.trunc() as u32)
}

/// Parse a publish timestamp.
///
/// Tried in order: RFC 3339 (`2025-01-02T03:04:05Z`), a naive ISO date-time
/// taken as UTC, a leading `YYYY-MM-DD`, and numeric epoch seconds.
#[must_use]
pub fn parse_publish_date(value: &Value) -> Option<DateTime<Utc>> {
    if is_falsy(value) {
        return None;
    }
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| epoch_from_secs(secs, 0))
            .or_else(|| n.as_f64().and_then(epoch_from_f64)),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    if let Some(date) = s
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if let Ok(secs) = s.parse::<i64>() {
        return epoch_from_secs(secs, 0);
    }
    s.parse::<f64>().ok().and_then(epoch_from_f64)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn epoch_from_f64(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    if whole.abs() > MAX_EPOCH_SECS as f64 {
        return None;
    }
    epoch_from_secs(whole as i64, nanos)
}

/// 9999-12-31T23:59:59Z; larger values are usually milliseconds.
const MAX_EPOCH_SECS: i64 = 253_402_300_799;

fn epoch_from_secs(secs: i64, nanos: u32) -> Option<DateTime<Utc>> {
    if !(-MAX_EPOCH_SECS..=MAX_EPOCH_SECS).contains(&secs) {
        return None;
    }
    DateTime::from_timestamp(secs, nanos)
}

/// A trimmed, non-empty string. Non-string values are rejected.
#[must_use]
pub fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// A list of tags from either a JSON array of strings or a comma separated
/// string. Returns `None` when nothing usable remains.
#[must_use]
pub fn string_list(value: &Value) -> Option<Vec<String>> {
    let tags: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(non_empty_string).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect(),
        _ => Vec::new(),
    };
    (!tags.is_empty()).then_some(tags)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
