//! Per-call transform context.

use std::sync::Arc;

use uni_core::{
    AccountFieldMappingConfig, Diagnostic, FieldMappingConfig, ObjectType, ProviderId, UnifyError,
};
use uni_schema::{CanonicalRegistry, ObjectSchema, ProviderLayout};

/// What a caller supplies for one unify/disunify call.
#[derive(Debug, Clone)]
pub struct TransformContext {
    pub provider: ProviderId,
    pub object_type: ObjectType,
    /// Key into the field mapping store. `None` means provider defaults only.
    pub tenant_mapping_id: Option<String>,
    pub account_config: Arc<AccountFieldMappingConfig>,
    /// Association types requested on read, in caller order.
    pub requested_associations: Vec<String>,
}

impl TransformContext {
    #[must_use]
    pub fn new(provider: ProviderId, object_type: ObjectType) -> Self {
        Self {
            provider,
            object_type,
            tenant_mapping_id: None,
            account_config: Arc::new(AccountFieldMappingConfig::default()),
            requested_associations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tenant_mapping(mut self, tenant_mapping_id: impl Into<String>) -> Self {
        self.tenant_mapping_id = Some(tenant_mapping_id.into());
        self
    }

    #[must_use]
    pub fn with_account_config(mut self, account_config: impl Into<Arc<AccountFieldMappingConfig>>) -> Self {
        self.account_config = account_config.into();
        self
    }

    #[must_use]
    pub fn with_associations<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requested_associations = types.into_iter().map(Into::into).collect();
        self
    }
}

/// Split a comma-separated association parameter (`"deal,company"`).
#[must_use]
pub fn parse_association_param(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// A [`TransformContext`] with every registry and store lookup done.
///
/// Building one is the only fallible step of a transform; once resolved, the
/// field loops cannot fail except on required-field checks during writes.
#[derive(Debug, Clone)]
pub struct ResolvedContext {
    pub provider: ProviderId,
    pub object_type: ObjectType,
    pub tenant_mapping_id: Option<String>,
    pub schema: ObjectSchema,
    pub layout: ProviderLayout,
    pub mapping: Arc<FieldMappingConfig>,
    pub account_config: Arc<AccountFieldMappingConfig>,
    /// Warnings raised while resolving (e.g. a missing tenant mapping).
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolvedContext {
    /// # Errors
    ///
    /// Returns [`UnifyError::UnknownObjectType`] if `object_type` has no
    /// schema, or [`UnifyError::UnknownProvider`] if `provider` has no layout
    /// for it.
    pub fn new(
        registry: &CanonicalRegistry,
        provider: ProviderId,
        object_type: ObjectType,
        mapping: Arc<FieldMappingConfig>,
        account_config: Arc<AccountFieldMappingConfig>,
    ) -> Result<Self, UnifyError> {
        let schema = registry.schema(object_type)?.clone();
        let layout = registry.layout(provider, object_type)?.clone();
        Ok(Self {
            provider,
            object_type,
            tenant_mapping_id: None,
            schema,
            layout,
            mapping,
            account_config,
            diagnostics: Vec::new(),
        })
    }

    /// Context with provider defaults only.
    ///
    /// # Errors
    ///
    /// See [`ResolvedContext::new`].
    pub fn with_defaults(
        registry: &CanonicalRegistry,
        provider: ProviderId,
        object_type: ObjectType,
    ) -> Result<Self, UnifyError> {
        Self::new(
            registry,
            provider,
            object_type,
            Arc::new(FieldMappingConfig::default()),
            Arc::new(AccountFieldMappingConfig::default()),
        )
    }

    /// Provider key for a standard field: tenant override, else layout default.
    #[must_use]
    pub fn source_key(&self, canonical_name: &str) -> Option<&str> {
        self.mapping
            .override_for(canonical_name)
            .or_else(|| self.layout.default_key(canonical_name))
    }

    /// Top-level provider keys a read of this context looks at: standard
    /// field keys (after overrides), mapped custom keys, and account-defined
    /// custom fields. Dotted paths contribute their first segment. Sorted and
    /// deduplicated.
    #[must_use]
    pub fn provider_keys(&self) -> Vec<String> {
        let standard = self
            .schema
            .fields
            .iter()
            .filter_map(|field| self.source_key(field.canonical_name));
        let custom = self
            .mapping
            .custom_field_mappings
            .iter()
            .map(|mapping| mapping.provider_field_key.as_str());
        let account = self
            .account_config
            .custom_fields(self.object_type)
            .iter()
            .map(|definition| definition.name.as_str());

        let mut keys: Vec<String> = standard
            .chain(custom)
            .chain(account)
            .filter_map(|key| key.split('.').next())
            .filter(|key| !key.is_empty())
            .map(ToString::to_string)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}
