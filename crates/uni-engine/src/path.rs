//! Dot-separated key paths into provider payloads.
//!
//! `owner.id` walks objects, `emails.0.email` walks arrays by index. A key
//! that exists verbatim (dots included) always wins over path traversal.

use serde_json::{Map, Value};

/// Read the value at `path`, if any.
#[must_use]
pub fn get_path<'a>(object: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = object.get(path) {
        return Some(value);
    }
    if !path.contains('.') {
        return None;
    }

    let mut segments = path.split('.');
    let mut current = object.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at `path`, creating intermediate objects and arrays.
pub fn set_path(object: &mut Map<String, Value>, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        object.insert((*first).to_string(), value);
        return;
    }
    let slot = object.entry((*first).to_string()).or_insert(Value::Null);
    set_in(slot, rest, value);
}

fn set_in(slot: &mut Value, segments: &[&str], value: Value) {
    let Some((head, tail)) = segments.split_first() else {
        *slot = value;
        return;
    };

    if let Ok(index) = head.parse::<usize>() {
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        if let Value::Array(items) = slot {
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            set_in(&mut items[index], tail, value);
        }
    } else {
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(map) = slot {
            let child = map.entry((*head).to_string()).or_insert(Value::Null);
            set_in(child, tail, value);
        }
    }
}
