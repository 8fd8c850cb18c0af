//! Normalization of caller-supplied filter payloads.

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::FilterCriteria;

/// Filter keys accepted from callers. Anything else is ignored.
pub const ALLOWED_FILTER_KEYS: &[&str] = &[
    "brand",
    "max_price",
    "condition",
    "color",
    "size",
    "category",
    "in_stock",
];

/// String values treated the same as an absent field.
const NULL_LIKE: &[&str] = &["", "none", "null"];

/// String values that read as `true` for `in_stock`.
const TRUTHY: &[&str] = &["true", "1", "yes"];

/// Normalize a raw filter object into typed criteria.
///
/// This never fails: unknown keys, nulls, blank or null-like strings and
/// values that cannot be read for their key are dropped, and the request
/// proceeds as if the caller had omitted them. `query` is not a filter key
/// and is ignored here.
#[must_use]
pub fn coerce_filters(raw: &Map<String, Value>) -> FilterCriteria {
    let mut criteria = FilterCriteria::default();
    if raw.is_empty() {
        debug!("Coerce filters skipped: empty input");
        return criteria;
    }

    for (key, raw_value) in raw {
        if !ALLOWED_FILTER_KEYS.contains(&key.as_str()) {
            debug!(key = %key, "Coerce filters skipping unsupported key");
            continue;
        }

        let value = match raw_value {
            Value::Null => {
                debug!(key = %key, "Coerce filters dropping null value");
                continue;
            }
            Value::String(s) => {
                let trimmed = s.trim();
                if NULL_LIKE.contains(&trimmed.to_lowercase().as_str()) {
                    debug!(key = %key, raw = %s, "Coerce filters dropping null-like string");
                    continue;
                }
                Value::String(trimmed.to_string())
            }
            other => other.clone(),
        };

        match key.as_str() {
            "max_price" => match parse_price(&value) {
                Some(price) => criteria.max_price = Some(price),
                None => debug!(%value, "Coerce filters invalid max_price"),
            },
            "in_stock" => criteria.in_stock = Some(parse_flag(&value)),
            field => {
                let Some(text) = to_text(&value) else {
                    debug!(key = %key, "Coerce filters dropping non-scalar value");
                    continue;
                };
                let slot = match field {
                    "brand" => &mut criteria.brand,
                    "condition" => &mut criteria.condition,
                    "color" => &mut criteria.color,
                    "size" => &mut criteria.size,
                    _ => &mut criteria.category,
                };
                *slot = Some(text);
            }
        }
    }

    debug!(?criteria, "Coerce filters output");
    criteria
}

/// Read a price ceiling. Numbers, numeric strings and booleans (as 1/0) are
/// accepted; NaN is not.
fn parse_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    (!price.is_nan()).then_some(price)
}

/// Read an `in_stock` flag. Anything that is not clearly truthy is `false`.
fn parse_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => TRUTHY.contains(&s.trim().to_lowercase().as_str()),
        Value::Number(n) => TRUTHY.contains(&n.to_string().as_str()),
        _ => false,
    }
}

/// Render a scalar as trimmed, non-empty text.
fn to_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
