//! Tenant and account field-mapping configuration, and the store boundary
//! that supplies it.
//!
//! The engine treats everything here as read-only input. Configuration is
//! created and edited by tenant actions elsewhere; a transform never mutates it.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ObjectType, ProviderId, ValueType};
use crate::errors::UnifyError;

/// Moves one provider custom field into or out of the additional-fields bag
/// under a stable canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CustomFieldMapping {
    pub provider_field_key: String,
    pub canonical_field_name: String,
    pub value_type: ValueType,
}

/// Active mapping for one (tenant mapping, provider, object type).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldMappingConfig {
    /// Canonical field name -> provider field name, for standard fields the
    /// tenant renamed on the provider side.
    #[serde(default)]
    pub standard_field_overrides: BTreeMap<String, String>,
    #[serde(default)]
    pub custom_field_mappings: Vec<CustomFieldMapping>,
}

impl FieldMappingConfig {
    /// Provider key override for a canonical standard field.
    #[must_use]
    pub fn override_for(&self, canonical_name: &str) -> Option<&str> {
        self.standard_field_overrides
            .get(canonical_name)
            .map(String::as_str)
    }

    /// Custom mapping whose canonical name matches `name`.
    #[must_use]
    pub fn custom_by_canonical(&self, name: &str) -> Option<&CustomFieldMapping> {
        self.custom_field_mappings
            .iter()
            .find(|m| m.canonical_field_name == name)
    }

    /// Whether some custom mapping reads from `provider_key`.
    #[must_use]
    pub fn maps_provider_key(&self, provider_key: &str) -> bool {
        self.custom_field_mappings
            .iter()
            .any(|m| m.provider_field_key == provider_key)
    }

    /// Check that provider keys and canonical names are each unique.
    ///
    /// # Errors
    ///
    /// Returns [`UnifyError::InvalidMapping`] naming the first duplicate.
    pub fn validate(&self) -> Result<(), UnifyError> {
        let mut provider_keys = HashSet::new();
        let mut canonical_names = HashSet::new();
        for mapping in &self.custom_field_mappings {
            if !provider_keys.insert(mapping.provider_field_key.as_str()) {
                return Err(UnifyError::InvalidMapping(format!(
                    "duplicate provider_field_key '{}'",
                    mapping.provider_field_key
                )));
            }
            if !canonical_names.insert(mapping.canonical_field_name.as_str()) {
                return Err(UnifyError::InvalidMapping(format!(
                    "duplicate canonical_field_name '{}'",
                    mapping.canonical_field_name
                )));
            }
        }
        Ok(())
    }
}

/// A custom field known to the account, independent of any tenant mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CustomFieldDefinition {
    pub name: String,
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Account-scoped catalog of known custom fields per object type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AccountFieldMappingConfig {
    #[serde(default)]
    pub objects: BTreeMap<ObjectType, Vec<CustomFieldDefinition>>,
}

impl AccountFieldMappingConfig {
    #[must_use]
    pub fn custom_fields(&self, object_type: ObjectType) -> &[CustomFieldDefinition] {
        self.objects.get(&object_type).map_or(&[], Vec::as_slice)
    }

    /// Builder-style registration of a custom field definition.
    #[must_use]
    pub fn with_field(mut self, object_type: ObjectType, name: &str, value_type: ValueType) -> Self {
        self.objects
            .entry(object_type)
            .or_default()
            .push(CustomFieldDefinition {
                name: name.to_string(),
                value_type,
                description: None,
            });
        self
    }
}

/// Lookup key for a [`FieldMappingConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingKey {
    pub tenant_mapping_id: String,
    pub provider: ProviderId,
    pub object_type: ObjectType,
}

impl MappingKey {
    #[must_use]
    pub fn new(tenant_mapping_id: impl Into<String>, provider: ProviderId, object_type: ObjectType) -> Self {
        Self {
            tenant_mapping_id: tenant_mapping_id.into(),
            provider,
            object_type,
        }
    }

    #[must_use]
    pub fn not_found(&self) -> UnifyError {
        UnifyError::MappingNotFound {
            tenant_mapping_id: self.tenant_mapping_id.clone(),
            provider: self.provider.to_string(),
            object_type: self.object_type.to_string(),
        }
    }
}

/// Read-only source of tenant field mappings.
#[async_trait]
pub trait FieldMappingStore: Send + Sync {
    /// Load the active mapping for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`UnifyError::MappingNotFound`] when no mapping exists; callers
    /// degrade to provider defaults. Other errors are store failures.
    async fn load_mapping(&self, key: &MappingKey) -> Result<FieldMappingConfig, UnifyError>;
}

/// Store backed by a map, for tests and for callers that resolve mappings
/// up front.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMappingStore {
    mappings: HashMap<MappingKey, FieldMappingConfig>,
}

impl InMemoryMappingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping after checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`UnifyError::InvalidMapping`] if `config` fails validation.
    pub fn insert(&mut self, key: MappingKey, config: FieldMappingConfig) -> Result<(), UnifyError> {
        config.validate()?;
        self.mappings.insert(key, config);
        Ok(())
    }
}

#[async_trait]
impl FieldMappingStore for InMemoryMappingStore {
    async fn load_mapping(&self, key: &MappingKey) -> Result<FieldMappingConfig, UnifyError> {
        self.mappings
            .get(key)
            .cloned()
            .ok_or_else(|| key.not_found())
    }
}
