//! Value coercion between provider JSON and [`FieldValue`].
//!
//! Reads accept the loose shapes providers actually return: numbers as
//! strings, booleans as `"true"`/`1`, and timestamps as RFC 3339, bare dates,
//! `YYYY-MM-DD HH:MM:SS`, or epoch seconds/milliseconds. Writes render values
//! the way the target provider's [`TimestampFormat`] expects.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;
use uni_core::{FieldValue, ValueType};
use uni_schema::TimestampFormat;

/// Epoch values at or above this magnitude are taken as milliseconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 100_000_000_000.0;

/// Coerce a provider value to `value_type`.
///
/// `Ok(None)` means the provider sent nothing usable (null, or an empty
/// string for a non-string field). `Err` carries a human-readable reason.
///
/// # Errors
///
/// Returns the reason the value cannot be represented as `value_type`.
pub fn coerce(value: &Value, value_type: ValueType, allowed: &[&str]) -> Result<Option<FieldValue>, String> {
    if value.is_null() {
        return Ok(None);
    }
    if value_type != ValueType::String && value.as_str().is_some_and(|s| s.trim().is_empty()) {
        return Ok(None);
    }

    let coerced = match value_type {
        ValueType::String => to_string(value)?,
        ValueType::Number => FieldValue::Number(to_number(value)?),
        ValueType::Boolean => FieldValue::Bool(to_bool(value)?),
        ValueType::Timestamp => FieldValue::Timestamp(to_timestamp(value)?),
        ValueType::Enum => to_enum(value, allowed)?,
        ValueType::Object => match value {
            Value::Object(_) | Value::Array(_) => FieldValue::Json(value.clone()),
            other => return Err(format!("expected an object, got {other}")),
        },
    };
    Ok(Some(coerced))
}

fn to_string(value: &Value) -> Result<FieldValue, String> {
    match value {
        Value::String(s) => Ok(FieldValue::String(s.clone())),
        Value::Number(n) => Ok(FieldValue::String(n.to_string())),
        Value::Bool(b) => Ok(FieldValue::String(b.to_string())),
        other => Err(format!("expected a string, got {other}")),
    }
}

fn to_number(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("number out of range: {n}")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("not a number: {s:?}")),
        other => Err(format!("expected a number, got {other}")),
    }
}

fn to_bool(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(format!("not a boolean: {n}")),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(format!("not a boolean: {s:?}")),
        },
        other => Err(format!("expected a boolean, got {other}")),
    }
}

fn to_enum(value: &Value, allowed: &[&str]) -> Result<FieldValue, String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => return Err(format!("expected an enum value, got {other}")),
    };
    if allowed.is_empty() {
        return Ok(FieldValue::String(raw));
    }
    allowed
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(raw.trim()))
        .map(|candidate| FieldValue::String((*candidate).to_string()))
        .ok_or_else(|| format!("{raw:?} is not one of {}", allowed.join(", ")))
}

fn to_timestamp(value: &Value) -> Result<DateTime<Utc>, String> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(from_epoch)
            .ok_or_else(|| format!("epoch out of range: {n}")),
        Value::String(s) => parse_timestamp(s).ok_or_else(|| format!("unrecognized timestamp: {s:?}")),
        other => Err(format!("expected a timestamp, got {other}")),
    }
}

/// Parse the timestamp spellings seen across providers.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // Salesforce: 2024-01-05T10:00:00.000+0000
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    raw.parse::<f64>().ok().and_then(from_epoch)
}

#[allow(clippy::cast_possible_truncation)]
fn from_epoch(epoch: f64) -> Option<DateTime<Utc>> {
    if !epoch.is_finite() {
        return None;
    }
    let millis = if epoch.abs() >= EPOCH_MILLIS_THRESHOLD {
        epoch
    } else {
        epoch * 1000.0
    };
    DateTime::from_timestamp_millis(millis.round() as i64)
}

/// Render a coerced value as provider JSON.
#[must_use]
pub fn render(value: &FieldValue, timestamps: TimestampFormat) -> Value {
    match value {
        FieldValue::Timestamp(ts) => match timestamps {
            TimestampFormat::Rfc3339 => Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            TimestampFormat::EpochMillis => Value::from(ts.timestamp_millis()),
            TimestampFormat::EpochSeconds => Value::String(format!(
                "{}.{:06}",
                ts.timestamp(),
                ts.timestamp_subsec_micros()
            )),
        },
        other => other.to_json(),
    }
}
