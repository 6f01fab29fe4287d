//! Serde roundtrip and JsonSchema validation tests for the shared types.

use std::collections::BTreeMap;

use schemars::schema_for;
use uni_core::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    unified_contact_roundtrip,
    UnifiedObject,
    UnifiedObject::new(ObjectType::Contact)
        .with_field("firstName", "Grace")
        .with_field("lastName", "Hopper")
        .with_additional("employeeCount", 12.0)
        .with_additional("vip", true)
);

roundtrip_and_validate!(
    unified_company_with_association_roundtrip,
    UnifiedObject,
    UnifiedObject {
        associations: vec![AssociatedObjects {
            association_type: "deal".into(),
            objects: vec![UnifiedObject::new(ObjectType::Deal).with_field("name", "Expansion")],
        }],
        ..UnifiedObject::new(ObjectType::Company).with_field("name", "Acme Inc")
    }
);

roundtrip_and_validate!(
    field_mapping_config_roundtrip,
    FieldMappingConfig,
    FieldMappingConfig {
        standard_field_overrides: BTreeMap::from([("email".to_string(), "work_email".to_string())]),
        custom_field_mappings: vec![CustomFieldMapping {
            provider_field_key: "hs_tier".into(),
            canonical_field_name: "tier".into(),
            value_type: ValueType::Enum,
        }],
    }
);

roundtrip_and_validate!(
    account_config_roundtrip,
    AccountFieldMappingConfig,
    AccountFieldMappingConfig::default()
        .with_field(ObjectType::Contact, "nickname", ValueType::String)
        .with_field(ObjectType::Deal, "renewalDate", ValueType::Timestamp)
);

roundtrip_and_validate!(
    diagnostic_roundtrip,
    Diagnostic,
    Diagnostic::for_field(DiagnosticKind::CoercionFailed, "amount", "not a number")
);
