//! Unwrapping of Contentstack response envelopes.
//!
//! Different SDK versions and API configurations have returned the record
//! list as a bare array, as the `[[records], count]` tuple, or wrapped in an
//! object under one of several keys. Everything is reduced to a plain
//! `Vec<Value>` here so callers never see the envelope.

use serde_json::Value;

/// Keys scanned, in order, when the body is an object without a known wrapper.
pub const RECORD_KEYS: [&str; 5] = ["entries", "items", "data", "results", "records"];

/// Extract the record list from a listing response body.
///
/// Unknown shapes yield an empty list.
pub fn unwrap_records(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => {
            // SDK tuple shape: the records are the first element
            if matches!(items.first(), Some(Value::Array(_))) {
                match items.into_iter().next() {
                    Some(Value::Array(inner)) => inner,
                    _ => Vec::new(),
                }
            } else {
                items
            }
        }
        Value::Object(mut map) => {
            if let Some(Value::Array(entries)) = map.remove("entries") {
                return entries;
            }
            if let Some(Value::Array(items)) = map.remove("items") {
                return items;
            }
            RECORD_KEYS
                .iter()
                .find_map(|key| match map.remove(*key) {
                    Some(Value::Array(records)) => Some(records),
                    _ => None,
                })
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// Extract a single record from a fetch response body.
///
/// Accepts `{ "entry": {...} }` or the bare record object.
pub fn unwrap_entry(body: Value) -> Option<Value> {
    match body {
        Value::Object(mut map) => match map.remove("entry") {
            Some(entry @ Value::Object(_)) => Some(entry),
            Some(_) => None,
            None if map.is_empty() => None,
            None => Some(Value::Object(map)),
        },
        _ => None,
    }
}
