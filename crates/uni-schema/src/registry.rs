//! Canonical Schema Registry.
//!
//! The `CanonicalRegistry` declares, per object type, the standard unified
//! fields and their semantic types, and per (provider, object type) where the
//! provider keeps each of them. All lookups are pure.

use std::collections::HashMap;

use uni_core::{ObjectType, ProviderId, UnifyError};

use crate::builtin::{KEY_TABLES, PROVIDER_PROFILES, object_schemas};
use crate::field::{ObjectSchema, ProviderLayout, StandardField};

/// Central store of canonical schemas and provider layouts.
#[derive(Debug, Clone, Default)]
pub struct CanonicalRegistry {
    schemas: HashMap<ObjectType, ObjectSchema>,
    layouts: HashMap<(ProviderId, ObjectType), ProviderLayout>,
}

impl CanonicalRegistry {
    /// A registry with no object types or providers.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the registry from the built-in schemas and key tables.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for schema in object_schemas() {
            registry.register_schema(schema);
        }
        for (provider, object_type, keys) in KEY_TABLES {
            let Some((_, envelope, timestamps)) =
                PROVIDER_PROFILES.iter().find(|(p, _, _)| p == provider)
            else {
                continue;
            };
            registry.register_layout(ProviderLayout {
                provider: *provider,
                object_type: *object_type,
                envelope: *envelope,
                timestamps: *timestamps,
                keys: *keys,
            });
        }
        registry
    }

    /// Add or replace the canonical schema for an object type.
    pub fn register_schema(&mut self, schema: ObjectSchema) {
        self.schemas.insert(schema.object_type, schema);
    }

    /// Add or replace a provider layout.
    pub fn register_layout(&mut self, layout: ProviderLayout) {
        self.layouts
            .insert((layout.provider, layout.object_type), layout);
    }

    /// Canonical schema for `object_type`.
    ///
    /// # Errors
    ///
    /// Returns [`UnifyError::UnknownObjectType`] if nothing is registered.
    pub fn schema(&self, object_type: ObjectType) -> Result<&ObjectSchema, UnifyError> {
        self.schemas
            .get(&object_type)
            .ok_or_else(|| UnifyError::UnknownObjectType(object_type.to_string()))
    }

    /// Ordered standard fields for `object_type`.
    ///
    /// # Errors
    ///
    /// Returns [`UnifyError::UnknownObjectType`] if nothing is registered.
    pub fn standard_fields(&self, object_type: ObjectType) -> Result<&[StandardField], UnifyError> {
        self.schema(object_type).map(|s| s.fields.as_slice())
    }

    /// Layout of `object_type` on `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`UnifyError::UnknownProvider`] if the provider has no table
    /// for this object type.
    pub fn layout(&self, provider: ProviderId, object_type: ObjectType) -> Result<&ProviderLayout, UnifyError> {
        self.layouts
            .get(&(provider, object_type))
            .ok_or_else(|| UnifyError::UnknownProvider(format!("{provider} has no {object_type} layout")))
    }

    /// Built-in provider key for a canonical field.
    #[must_use]
    pub fn default_field_key(
        &self,
        provider: ProviderId,
        object_type: ObjectType,
        canonical_name: &str,
    ) -> Option<&'static str> {
        self.layouts
            .get(&(provider, object_type))
            .and_then(|l| l.default_key(canonical_name))
    }

    /// Association types a caller may request for `object_type`. Empty for
    /// unknown object types.
    #[must_use]
    pub fn association_whitelist(&self, object_type: ObjectType) -> &[&'static str] {
        self.schemas
            .get(&object_type)
            .map_or(&[], |s| s.associations.as_slice())
    }

    /// Registered object types, sorted.
    #[must_use]
    pub fn object_types(&self) -> Vec<ObjectType> {
        let mut types: Vec<ObjectType> = self.schemas.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Providers with a layout for `object_type`, sorted.
    #[must_use]
    pub fn providers_for(&self, object_type: ObjectType) -> Vec<ProviderId> {
        let mut providers: Vec<ProviderId> = self
            .layouts
            .keys()
            .filter(|(_, t)| *t == object_type)
            .map(|(p, _)| *p)
            .collect();
        providers.sort_unstable();
        providers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{TimestampFormat, WriteEnvelope};
    use uni_core::ValueType;

    fn registry() -> CanonicalRegistry {
        CanonicalRegistry::builtin()
    }

    #[test]
    fn builtin_registers_every_object_type() {
        assert_eq!(registry().object_types(), ObjectType::ALL.to_vec());
    }

    #[test]
    fn standard_fields_are_ordered() {
        let reg = registry();
        let names: Vec<_> = reg
            .standard_fields(ObjectType::Contact)
            .unwrap()
            .iter()
            .map(|f| f.canonical_name)
            .collect();
        assert_eq!(
            names,
            [
                "id",
                "remoteId",
                "firstName",
                "lastName",
                "phone",
                "email",
                "createdTimestamp",
                "updatedTimestamp"
            ]
        );
    }

    #[test]
    fn empty_registry_reports_unknown_object_type() {
        let reg = CanonicalRegistry::empty();
        assert!(matches!(
            reg.standard_fields(ObjectType::Deal),
            Err(UnifyError::UnknownObjectType(t)) if t == "deal"
        ));
        assert!(reg.association_whitelist(ObjectType::Deal).is_empty());
    }

    #[test]
    fn chat_provider_has_no_crm_layout() {
        let reg = registry();
        assert!(matches!(
            reg.layout(ProviderId::Slack, ObjectType::Contact),
            Err(UnifyError::UnknownProvider(_))
        ));
        assert!(reg.layout(ProviderId::Slack, ObjectType::Message).is_ok());
    }

    #[test]
    fn default_keys_come_from_static_tables() {
        let reg = registry();
        assert_eq!(
            reg.default_field_key(ProviderId::Hubspot, ObjectType::Contact, "firstName"),
            Some("firstname")
        );
        assert_eq!(
            reg.default_field_key(ProviderId::Sfdc, ObjectType::Deal, "stage"),
            Some("StageName")
        );
        assert_eq!(
            reg.default_field_key(ProviderId::Pipedrive, ObjectType::Company, "industry"),
            None
        );
    }

    #[test]
    fn provider_profiles_flow_into_layouts() {
        let reg = registry();
        let hubspot = reg.layout(ProviderId::Hubspot, ObjectType::Company).unwrap();
        assert_eq!(hubspot.envelope, WriteEnvelope::Properties);
        assert_eq!(hubspot.timestamps, TimestampFormat::EpochMillis);
        let zoho = reg.layout(ProviderId::Zohocrm, ObjectType::Company).unwrap();
        assert_eq!(zoho.envelope, WriteEnvelope::DataArray);
    }

    #[test]
    fn new_object_schema_can_be_registered_without_code_changes() {
        let mut reg = CanonicalRegistry::empty();
        reg.register_schema(ObjectSchema {
            object_type: ObjectType::Lead,
            fields: vec![StandardField::string("title").required()],
            associations: vec!["deal"],
        });
        let fields = reg.standard_fields(ObjectType::Lead).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].value_type, ValueType::String);
        assert_eq!(reg.association_whitelist(ObjectType::Lead), &["deal"]);
    }

    #[test]
    fn providers_for_lists_supporting_providers() {
        let reg = registry();
        assert_eq!(
            reg.providers_for(ObjectType::Message),
            vec![ProviderId::Slack, ProviderId::Discord]
        );
    }
}
