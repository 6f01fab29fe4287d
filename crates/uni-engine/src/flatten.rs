//! Merging a provider's nested `properties` object into the top level.

use serde_json::{Map, Value};
use uni_schema::WriteEnvelope;

/// Sub-object some providers use to hold field values.
pub const PROPERTIES_KEY: &str = "properties";

/// Key Zoho-style providers wrap records under, on reads and writes alike.
pub const DATA_KEY: &str = "data";

/// Strip a single-record `data` array from a [`WriteEnvelope::DataArray`]
/// provider's payload. Anything else is returned as is.
#[must_use]
pub fn unwrap_envelope(raw: &Value, envelope: WriteEnvelope) -> &Value {
    if envelope != WriteEnvelope::DataArray {
        return raw;
    }
    match raw.get(DATA_KEY).and_then(Value::as_array).map(Vec::as_slice) {
        Some([record]) if raw.as_object().is_some_and(|m| m.len() == 1) => record,
        _ => raw,
    }
}

/// Shallow-merge `raw` with its `properties` sub-object.
///
/// Nested values win on key collision. The `properties` key itself is dropped
/// once merged, so flattening already-flat input is a no-op. Non-object input
/// yields `None`.
#[must_use]
pub fn flatten(raw: &Value) -> Option<Map<String, Value>> {
    let Value::Object(map) = raw else {
        return None;
    };
    let mut flat = map.clone();
    match flat.remove(PROPERTIES_KEY) {
        Some(Value::Object(properties)) => flat.extend(properties),
        Some(other) => {
            flat.insert(PROPERTIES_KEY.to_string(), other);
        }
        None => {}
    }
    Some(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_properties_win_on_collision() {
        let raw = json!({"name": "Acme", "id": "1", "properties": {"name": "Acme Inc", "industry": "Tech"}});
        let flat = flatten(&raw).unwrap();
        assert_eq!(
            Value::Object(flat),
            json!({"name": "Acme Inc", "id": "1", "industry": "Tech"})
        );
    }

    #[test]
    fn flatten_is_idempotent() {
        let raw = json!({"a": 1, "properties": {"b": 2}});
        let once = Value::Object(flatten(&raw).unwrap());
        let twice = Value::Object(flatten(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn scalar_properties_value_is_kept() {
        let raw = json!({"properties": "n/a"});
        assert_eq!(Value::Object(flatten(&raw).unwrap()), raw);
    }

    #[test]
    fn data_array_envelope_is_unwrapped() {
        let raw = json!({"data": [{"Deal_Name": "Renewal"}]});
        assert_eq!(
            unwrap_envelope(&raw, WriteEnvelope::DataArray),
            &json!({"Deal_Name": "Renewal"})
        );
        assert_eq!(unwrap_envelope(&raw, WriteEnvelope::Flat), &raw);
    }

    #[test]
    fn data_envelope_with_siblings_or_many_records_is_kept() {
        let many = json!({"data": [{"id": "1"}, {"id": "2"}]});
        assert_eq!(unwrap_envelope(&many, WriteEnvelope::DataArray), &many);

        let record = json!({"data": [{"id": "1"}], "id": "7"});
        assert_eq!(unwrap_envelope(&record, WriteEnvelope::DataArray), &record);
    }

    #[test]
    fn non_object_input_is_rejected() {
        assert!(flatten(&json!([1, 2])).is_none());
        assert!(flatten(&Value::Null).is_none());
    }
}
