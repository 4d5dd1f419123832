//! The loose-to-strict boundary.
//!
//! Persisted blobs and imported files may carry missing fields, stringified
//! numbers or garbage. Everything read from outside the process passes through
//! here before it becomes a [`ProductRecord`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use stockroom_core::{DomainError, DomainResult, Sku};

use crate::record::{DEFAULT_NAME, ProductRecord};

/// Outcome of sanitizing a list of candidate records.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedBatch {
    pub records: Vec<ProductRecord>,
    /// Candidates dropped for a missing id/category or a repeated id.
    pub dropped: usize,
}

/// Non-negative integer from a JSON value.
///
/// Numbers truncate toward zero; strings parse their leading digits. Negative,
/// non-numeric or missing input is 0.
pub fn coerce_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(u) = n.as_u64() {
                u
            } else {
                n.as_f64().map(count_from_f64).unwrap_or(0)
            }
        }
        Some(Value::String(s)) => coerce_count_str(s),
        _ => 0,
    }
}

/// Non-negative integer from user text (`"7"`, `" 12 uds"`, `"3.9"` → 3).
pub fn coerce_count_str(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if trimmed.starts_with('-') {
        return 0;
    }
    let digits: String = trimmed
        .trim_start_matches('+')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    // Only digits remain, so a failed parse is an overflow.
    digits.parse().unwrap_or(u64::MAX)
}

/// Non-negative decimal from a JSON value. Invalid input is 0.
pub fn coerce_price(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => clamp_price(n.as_f64().unwrap_or(0.0)),
        Some(Value::String(s)) => coerce_price_str(s),
        _ => 0.0,
    }
}

/// Non-negative decimal from user text (`"18.50"`, `"12,5"` is 12).
pub fn coerce_price_str(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<f64>() {
        return clamp_price(v);
    }

    // Longest numeric prefix, the way a lenient form field reads "9.99 EUR".
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in trimmed.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '+' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }
    trimmed[..end].parse::<f64>().map(clamp_price).unwrap_or(0.0)
}

/// Trimmed optional text; blank means absent.
pub fn optional_text(raw: &str) -> Option<String> {
    Some(raw.trim()).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Negative, NaN and infinite prices become 0.
pub fn clamp_price(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

fn count_from_f64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.trunc() as u64
    } else {
        0
    }
}

fn text(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn timestamp(map: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    map.get(key)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Sanitize one candidate. `None` when it lacks an id or a category.
pub fn sanitize_record(value: &Value, now: DateTime<Utc>) -> Option<ProductRecord> {
    let map = value.as_object()?;

    let id = Sku::parse(&text(map, "id")).ok()?;
    let category = text(map, "category");
    if category.is_empty() {
        return None;
    }

    let name = match text(map, "name") {
        n if n.is_empty() => DEFAULT_NAME.to_string(),
        n => n,
    };
    let quantity = coerce_count(map.get("quantity").or_else(|| map.get("systemStock")));
    let photo = optional_text(&text(map, "photo"));
    let created_at = timestamp(map, "createdAt").unwrap_or(now);
    let last_updated = timestamp(map, "lastUpdated").unwrap_or(created_at);

    Some(ProductRecord {
        id,
        category,
        name,
        color: text(map, "color"),
        size: text(map, "size"),
        observation: text(map, "observation"),
        location: text(map, "location"),
        quantity,
        price: coerce_price(map.get("price")),
        physical_count: coerce_count(map.get("physicalCount")),
        photo,
        created_at,
        last_updated,
    })
}

/// Sanitize every candidate, keeping the first occurrence of each id.
pub fn sanitize_items(items: &[Value], now: DateTime<Utc>) -> SanitizedBatch {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(items.len());
    let mut dropped = 0;

    for item in items {
        match sanitize_record(item, now) {
            Some(record) if seen.insert(record.id.clone()) => records.push(record),
            Some(record) => {
                tracing::warn!(sku = %record.id, "dropping repeated SKU");
                dropped += 1;
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::warn!(dropped, kept = records.len(), "dropped invalid inventory records");
    }

    SanitizedBatch { records, dropped }
}

/// Locate the record list: a bare array, or an envelope with an `items` array.
pub fn extract_items(payload: &Value) -> DomainResult<&[Value]> {
    match payload {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Object(map) => match map.get("items") {
            Some(Value::Array(items)) => Ok(items.as_slice()),
            _ => Err(DomainError::malformed_import(
                "expected an array or an object with an `items` array",
            )),
        },
        _ => Err(DomainError::malformed_import(
            "expected an array or an object with an `items` array",
        )),
    }
}

/// Parse and sanitize an import file's text. Rejects payloads with no valid record.
pub fn parse_import(raw: &str, now: DateTime<Utc>) -> DomainResult<SanitizedBatch> {
    let payload: Value = serde_json::from_str(raw)
        .map_err(|e| DomainError::malformed_import(format!("invalid JSON: {e}")))?;
    let items = extract_items(&payload)?;
    let batch = sanitize_items(items, now);
    if batch.records.is_empty() {
        return Err(DomainError::malformed_import("no valid records found"));
    }
    Ok(batch)
}
