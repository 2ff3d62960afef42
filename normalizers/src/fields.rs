//! Lookup helpers over loosely-typed provider JSON.
//!
//! Every helper returns `None` for missing keys, JSON nulls, non-string values
//! and strings that are blank after trimming.

use serde_json::{Map, Value};

pub fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(value_text)
}

/// First key that yields a value wins
pub fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(fields, key))
}

/// Follow a path of object keys, e.g. `["organization", "name"]`
pub fn nested_text(fields: &Map<String, Value>, path: &[&str]) -> Option<String> {
    let (last, parents) = path.split_last()?;
    let mut current = fields;
    for key in parents {
        current = current.get(*key)?.as_object()?;
    }
    text(current, last)
}

/// Join the parts that are present; `None` when none are
pub fn join_present(parts: &[Option<String>], separator: &str) -> Option<String> {
    let present: Vec<&str> = parts.iter().flatten().map(|s| s.as_str()).collect();
    if present.is_empty() {
        None
    } else {
        Some(present.join(separator))
    }
}

pub fn objects<'a>(
    fields: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Map<String, Value>> {
    fields
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn value_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
