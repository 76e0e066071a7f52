// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of raw backend payloads onto [`MemoryItem`].
//!
//! Each transport has its own mapping function; call sites never coerce
//! fields inline. Shared rules: content falls back `content` ->
//! `content_preview` -> empty; missing scores stay `None`; unknown or
//! missing sectors become `semantic`.

use recall_core::timestamp::parse_timestamp;
use recall_core::{MemoryItem, Sector};
use serde_json::Value;

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn num_field(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

fn first_sector(value: &Value) -> Option<&str> {
    value
        .get("sectors")
        .and_then(Value::as_array)
        .and_then(|s| s.first())
        .and_then(Value::as_str)
}

fn content(value: &Value) -> String {
    str_field(value, "content")
        .filter(|c| !c.is_empty())
        .or_else(|| str_field(value, "content_preview"))
        .unwrap_or_default()
        .to_string()
}

fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Tags arrive as an array or as a JSON-encoded array string.
fn tags(value: Option<&Value>) -> Vec<String> {
    let collect = |items: &[Value]| -> Vec<String> {
        items
            .iter()
            .filter_map(|t| t.as_str().map(String::from))
            .collect()
    };
    match value {
        Some(Value::Array(items)) => collect(items),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => collect(&items),
            _ if s.is_empty() => Vec::new(),
            _ => vec![s.clone()],
        },
        _ => Vec::new(),
    }
}

/// Metadata arrives as an object or as a JSON-encoded object string.
fn metadata(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::Null => None,
        Value::String(s) => serde_json::from_str(s).ok(),
        other => Some(other.clone()),
    }
}

fn base_item(value: &Value, id: String, sector: Sector) -> MemoryItem {
    let time = |key: &str| value.get(key).and_then(parse_timestamp);
    MemoryItem {
        id,
        content: content(value),
        score: num_field(value, "score"),
        salience: num_field(value, "salience"),
        sector,
        tags: tags(value.get("tags")),
        metadata: metadata(value.get("metadata")),
        created_at: time("created_at"),
        updated_at: time("updated_at"),
        last_seen_at: time("last_seen_at"),
    }
}

/// Map one memory from a REST response.
pub fn rest_memory(value: &Value) -> MemoryItem {
    let sector =
        Sector::from_backend(str_field(value, "primary_sector").or_else(|| first_sector(value)));
    let id = id_string(value.get("id")).unwrap_or_default();
    base_item(value, id, sector)
}

/// Map one memory from a tool-call result.
///
/// Tool results may name the id `memory_id` and the sector `sector`.
pub fn tool_memory(value: &Value) -> MemoryItem {
    let sector = Sector::from_backend(
        str_field(value, "primary_sector")
            .or_else(|| str_field(value, "sector"))
            .or_else(|| first_sector(value)),
    );
    let id = id_string(value.get("id"))
        .or_else(|| id_string(value.get("memory_id")))
        .unwrap_or_default();
    base_item(value, id, sector)
}

/// The list of items in `payload`: the payload itself when it is an array,
/// else the first of `keys` holding an array.
pub fn items<'a>(payload: &'a Value, keys: &[&str]) -> &'a [Value] {
    if let Value::Array(items) = payload {
        return items;
    }
    keys.iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Unwrap a tool-call envelope down to its JSON payload.
///
/// Dispatchers may return the payload directly, under `structuredContent`,
/// or as text content blocks carrying serialized JSON.
pub fn tool_payload(result: Value) -> Value {
    if let Some(structured) = result.get("structuredContent") {
        return structured.clone();
    }
    if let Some(Value::Array(blocks)) = result.get("content") {
        let text: String = blocks
            .iter()
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect();
        if let Ok(parsed) = serde_json::from_str::<Value>(&text) {
            return parsed;
        }
    }
    result
}

/// Drop results whose relevance is known and below `threshold`.
/// Results without a score are kept.
pub fn apply_threshold(items: Vec<MemoryItem>, threshold: f64) -> Vec<MemoryItem> {
    items
        .into_iter()
        .filter(|item| item.score.is_none_or(|s| s >= threshold))
        .collect()
}
