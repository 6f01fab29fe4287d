use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use uni_core::AccountFieldMappingConfig;
use uni_schema::MappingSchemas;

/// Records read from an input document.
#[derive(Debug, PartialEq)]
pub enum Records {
    One(Value),
    Many(Vec<Value>),
}

impl Records {
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Many(items),
            other => Self::One(other),
        }
    }
}

/// Read a JSON document from `path`, or from stdin when `path` is `-`.
pub fn read_json(path: &Path) -> anyhow::Result<Value> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&contents).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Load an account custom-field catalog, validating it against its JSON
/// Schema before deserializing.
pub fn read_account_config(path: &Path) -> anyhow::Result<AccountFieldMappingConfig> {
    let raw = read_json(path)?;
    MappingSchemas::new()
        .validate("account_field_mapping_config", &raw)
        .with_context(|| format!("invalid account field catalog {}", path.display()))?;
    serde_json::from_value(raw)
        .with_context(|| format!("invalid account field catalog {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use uni_core::{ObjectType, ValueType};

    use super::*;

    #[test]
    fn arrays_become_batches() {
        assert_eq!(
            Records::from_value(json!([{"id": "1"}, {"id": "2"}])),
            Records::Many(vec![json!({"id": "1"}), json!({"id": "2"})])
        );
        assert_eq!(Records::from_value(json!({"id": "1"})), Records::One(json!({"id": "1"})));
    }

    #[test]
    fn account_config_is_loaded_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"objects": {{"contact": [{{"name": "favoriteColor", "value_type": "string"}}]}}}}"#
        )
        .expect("write");

        let config = read_account_config(file.path()).expect("config loads");
        let fields = config.custom_fields(ObjectType::Contact);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "favoriteColor");
        assert_eq!(fields[0].value_type, ValueType::String);
    }

    #[test]
    fn account_config_with_bad_value_type_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"objects": {{"deal": [{{"name": "tier", "value_type": "decimal"}}]}}}}"#
        )
        .expect("write");

        assert!(read_account_config(file.path()).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_json(Path::new("/nonexistent/records.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/records.json"));
    }
}
