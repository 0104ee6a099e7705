// src/listview/record.rs

use serde_json::Value;

/// Walks a dotted path (`productId.title`, `location.city`) through nested
/// objects. `null` counts as missing.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    match unwrap_extended(current) {
        Value::Null => None,
        v => Some(v),
    }
}

/// Strips Mongo extended-JSON wrappers (`{ "$oid": .. }`, `{ "$date": .. }`,
/// `{ "$numberLong": .. }`) down to the wrapped value.
pub fn unwrap_extended(value: &Value) -> &Value {
    if let Value::Object(map) = value {
        if map.len() == 1 {
            for key in ["$oid", "$date", "$numberLong", "$numberDecimal"] {
                if let Some(inner) = map.get(key) {
                    return unwrap_extended(inner);
                }
            }
        }
    }
    value
}

/// The record's identifier from `_id` or `id`.
pub fn record_id(record: &Value) -> Option<String> {
    ["_id", "id"].iter().find_map(|key| match lookup(record, key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Flattens a value into the text shown in a table cell.
pub fn display_text(value: &Value) -> String {
    match unwrap_extended(value) {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        // Populated references: show their human name.
        Value::Object(map) => ["name", "title", "label", "fullName", "email"]
            .iter()
            .find_map(|k| map.get(*k).map(display_text).filter(|s| !s.is_empty()))
            .unwrap_or_default(),
    }
}

pub fn as_number(value: &Value) -> Option<f64> {
    match unwrap_extended(value) {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Loose truthiness used by boolean status flags.
pub fn as_flag(value: &Value) -> Option<bool> {
    match unwrap_extended(value) {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" | "active" | "enabled" | "published" => Some(true),
            "false" | "no" | "0" | "inactive" | "disabled" | "draft" | "blocked" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Shallow merge of `patch` into `target`, used for optimistic updates.
pub fn merge_into(target: &mut Value, patch: &Value) {
    if let (Value::Object(dst), Value::Object(src)) = (target, patch) {
        for (k, v) in src {
            dst.insert(k.clone(), v.clone());
        }
    }
}
