//! JSON Schemas for mapping documents and unified records.
//!
//! `MappingSchemas` builds schemas from uni-core types at construction time
//! using [`schemars::schema_for!`] and validates raw JSON via `jsonschema`.

use std::collections::{BTreeMap, HashMap};

use schemars::schema_for;
use uni_core::{FieldMappingConfig, ObjectType, ProviderId};

use crate::error::SchemaError;

/// One tenant mapping document: provider -> object type -> mapping.
pub type MappingDocument = BTreeMap<ProviderId, BTreeMap<ObjectType, FieldMappingConfig>>;

/// Named JSON Schemas for configuration and record types.
pub struct MappingSchemas {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value`. Panics if `serde_json::to_value` fails (should be
/// infallible for valid `schemars` output).
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap());
    };
}

impl MappingSchemas {
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on any `schemars`-generated
    /// schema. This is not expected in practice because `schemars` always
    /// produces valid JSON-serialisable output.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        register!(schemas, "field_mapping_config", FieldMappingConfig);
        register!(schemas, "custom_field_mapping", uni_core::CustomFieldMapping);
        register!(
            schemas,
            "account_field_mapping_config",
            uni_core::AccountFieldMappingConfig
        );
        register!(schemas, "mapping_document", MappingDocument);
        register!(schemas, "unified_object", uni_core::UnifiedObject);
        register!(schemas, "diagnostic", uni_core::Diagnostic);

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Compile {
                schema: name.to_string(),
                reason: e.to_string(),
            })?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{}: {e}", e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed {
                schema: name.to_string(),
                errors,
            })
        }
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for MappingSchemas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schemas() -> MappingSchemas {
        MappingSchemas::new()
    }

    #[test]
    fn list_is_sorted_and_complete() {
        assert_eq!(
            schemas().list(),
            vec![
                "account_field_mapping_config",
                "custom_field_mapping",
                "diagnostic",
                "field_mapping_config",
                "mapping_document",
                "unified_object",
            ]
        );
    }

    #[test]
    fn valid_mapping_config_passes() {
        let config = json!({
            "standard_field_overrides": {"email": "work_email"},
            "custom_field_mappings": [
                {"provider_field_key": "hs_tier", "canonical_field_name": "tier", "value_type": "enum"}
            ]
        });
        assert!(schemas().validate("field_mapping_config", &config).is_ok());
    }

    #[test]
    fn unknown_value_type_is_rejected() {
        let config = json!({
            "custom_field_mappings": [
                {"provider_field_key": "x", "canonical_field_name": "y", "value_type": "decimal"}
            ]
        });
        let result = schemas().validate("field_mapping_config", &config);
        assert!(matches!(result, Err(SchemaError::ValidationFailed { schema, errors }) if schema == "field_mapping_config" && !errors.is_empty()));
    }

    #[test]
    fn missing_required_mapping_key_is_rejected() {
        let mapping = json!({"canonical_field_name": "tier", "value_type": "string"});
        assert!(schemas().validate("custom_field_mapping", &mapping).is_err());
    }

    #[test]
    fn mapping_document_validates_nested_sections() {
        let doc = json!({
            "hubspot": {
                "contact": {"standard_field_overrides": {"phone": "mobilephone"}}
            }
        });
        assert!(schemas().validate("mapping_document", &doc).is_ok());
    }

    #[test]
    fn validate_nonexistent_schema_returns_not_found() {
        let result = schemas().validate("bogus", &json!({}));
        assert!(matches!(result, Err(SchemaError::NotFound(_))));
    }
}
