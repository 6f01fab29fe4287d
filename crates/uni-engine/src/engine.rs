//! The `Engine` facade: mapping resolution, catalog and association
//! enrichment, and single or batch transforms.

use std::sync::Arc;

use serde_json::Value;
use uni_config::EngineConfig;
use uni_core::{
    AccountFieldMappingConfig, Diagnostic, DiagnosticKind, FieldMappingStore, InMemoryMappingStore,
    MappingKey, ObjectType, ProviderId, Transformed, UnifiedObject, UnifyError,
};
use uni_schema::CanonicalRegistry;

use crate::adapter::{AdapterSet, ProviderAdapter};
use crate::batch::{BatchItem, ItemFailure, run_batch, with_deadline};
use crate::catalog_cache::CatalogCache;
use crate::context::{ResolvedContext, TransformContext};
use crate::custom_fields::{ProviderFieldCatalog, resolve_custom_fields};
use crate::disunify::disunify_object;
use crate::unify::unify_object;

/// Key under which providers return a record's association references.
pub const ASSOCIATIONS_KEY: &str = "associations";

/// Entry point for unify/disunify calls.
///
/// Cheap to clone; clones share the registry, mapping store, adapters and
/// catalog cache.
#[derive(Clone)]
pub struct Engine {
    registry: Arc<CanonicalRegistry>,
    store: Arc<dyn FieldMappingStore>,
    adapters: Arc<AdapterSet>,
    catalogs: Arc<CatalogCache>,
    config: EngineConfig,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("adapters", &self.adapters)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct EngineBuilder {
    registry: Option<CanonicalRegistry>,
    store: Option<Arc<dyn FieldMappingStore>>,
    adapters: AdapterSet,
    config: EngineConfig,
}

impl EngineBuilder {
    /// Replace the built-in canonical registry.
    #[must_use]
    pub fn registry(mut self, registry: CanonicalRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn mapping_store(mut self, store: Arc<dyn FieldMappingStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.register(adapter);
        self
    }

    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn build(self) -> Engine {
        Engine {
            registry: Arc::new(self.registry.unwrap_or_else(CanonicalRegistry::builtin)),
            store: self
                .store
                .unwrap_or_else(|| Arc::new(InMemoryMappingStore::new())),
            adapters: Arc::new(self.adapters),
            catalogs: Arc::new(CatalogCache::new(self.config.catalog_cache_ttl())),
            config: self.config,
        }
    }
}

impl Engine {
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    #[must_use]
    pub fn registry(&self) -> &CanonicalRegistry {
        &self.registry
    }

    #[must_use]
    pub fn adapters(&self) -> &AdapterSet {
        &self.adapters
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Look up schema, layout and tenant mapping for `ctx`.
    ///
    /// A missing tenant mapping is not an error: provider defaults are used
    /// and a [`DiagnosticKind::MappingNotFound`] diagnostic is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`UnifyError::UnknownObjectType`] or
    /// [`UnifyError::UnknownProvider`] when the registry cannot place the
    /// record, or any other error the mapping store raises.
    pub async fn resolve(&self, ctx: &TransformContext) -> Result<ResolvedContext, UnifyError> {
        self.resolve_parts(
            ctx.provider,
            ctx.object_type,
            ctx.tenant_mapping_id.as_deref(),
            Arc::clone(&ctx.account_config),
        )
        .await
    }

    pub(crate) async fn resolve_parts(
        &self,
        provider: ProviderId,
        object_type: ObjectType,
        tenant_mapping_id: Option<&str>,
        account_config: Arc<AccountFieldMappingConfig>,
    ) -> Result<ResolvedContext, UnifyError> {
        let mut resolved = ResolvedContext::new(&self.registry, provider, object_type, Arc::default(), account_config)?;
        let Some(tenant_mapping_id) = tenant_mapping_id else {
            return Ok(resolved);
        };
        resolved.tenant_mapping_id = Some(tenant_mapping_id.to_string());

        match self
            .store
            .load_mapping(&MappingKey::new(tenant_mapping_id, provider, object_type))
            .await
        {
            Ok(mapping) => resolved.mapping = Arc::new(mapping),
            Err(error @ UnifyError::MappingNotFound { .. }) => {
                tracing::debug!(%provider, %object_type, tenant_mapping_id, "no tenant mapping; using provider defaults");
                resolved
                    .diagnostics
                    .push(Diagnostic::new(DiagnosticKind::MappingNotFound, error.to_string()));
            }
            Err(error) => return Err(error),
        }
        Ok(resolved)
    }

    /// Unify one provider record.
    ///
    /// # Errors
    ///
    /// Fails on the fatal classes only: unknown object type or provider, a
    /// failing mapping store, or a record that is not a JSON object.
    pub async fn unify(&self, raw: Value, ctx: &TransformContext) -> Result<Transformed<UnifiedObject>, UnifyError> {
        let resolved = self.resolve(ctx).await?;
        let mut out = self
            .unify_prepared(raw, &resolved, &ctx.requested_associations)
            .await?;
        prepend(&mut out.diagnostics, &resolved.diagnostics);
        Ok(out)
    }

    /// Fetch one record through the provider's adapter and unify it.
    ///
    /// The adapter is asked for every provider key the resolved mapping
    /// reads, so tenant overrides and custom fields come back with the
    /// record.
    ///
    /// # Errors
    ///
    /// Fails like [`Engine::unify`], or with [`UnifyError::Adapter`] when no
    /// adapter is registered or the fetch fails.
    pub async fn fetch(&self, id: &str, ctx: &TransformContext) -> Result<Transformed<UnifiedObject>, UnifyError> {
        let resolved = self.resolve(ctx).await?;
        let adapter = self.adapters.get(ctx.provider).ok_or_else(|| UnifyError::Adapter {
            provider: ctx.provider.to_string(),
            message: "no adapter registered".to_string(),
        })?;
        let fields = resolved.provider_keys();
        tracing::debug!(provider = %ctx.provider, object_type = %ctx.object_type, %id, fields = fields.len(), "fetching record");
        let raw = adapter
            .fetch_object(ctx.object_type, id, &fields)
            .await
            .map_err(|e| e.into_unify(ctx.provider))?;
        let mut out = self
            .unify_prepared(raw, &resolved, &ctx.requested_associations)
            .await?;
        prepend(&mut out.diagnostics, &resolved.diagnostics);
        Ok(out)
    }

    /// Build the provider write payload for one unified object.
    ///
    /// # Errors
    ///
    /// Fails on unknown object type or provider, a failing mapping store, or
    /// a missing required field.
    pub async fn disunify(&self, unified: &UnifiedObject, ctx: &TransformContext) -> Result<Transformed<Value>, UnifyError> {
        let resolved = self.resolve(ctx).await?;
        let mut out = disunify_object(unified, &resolved)?;
        prepend(&mut out.diagnostics, &resolved.diagnostics);
        Ok(out)
    }

    /// Unify every record, preserving input order.
    ///
    /// Mapping config is resolved once for the whole batch. Records are
    /// processed concurrently up to `batch_concurrency`; a record that fails
    /// leaves a [`BatchItem::Failed`] at its index.
    ///
    /// # Errors
    ///
    /// Fails if the context cannot be resolved, or with
    /// [`UnifyError::Cancelled`] if the batch exceeds `batch_timeout_secs`.
    pub async fn unify_all(
        &self,
        raws: Vec<Value>,
        ctx: &TransformContext,
    ) -> Result<Vec<BatchItem<UnifiedObject>>, UnifyError> {
        let resolved = Arc::new(self.resolve(ctx).await?);
        let requested: Arc<[String]> = ctx.requested_associations.clone().into();
        tracing::debug!(provider = %ctx.provider, object_type = %ctx.object_type, items = raws.len(), "unifying batch");

        let run = run_batch(raws, self.config.batch_concurrency, |raw| {
            let engine = self.clone();
            let resolved = Arc::clone(&resolved);
            let requested = Arc::clone(&requested);
            async move {
                let mut out = engine.unify_prepared(raw, &resolved, &requested).await?;
                prepend(&mut out.diagnostics, &resolved.diagnostics);
                Ok(out)
            }
        });
        with_deadline(self.config.batch_timeout(), run).await
    }

    /// Disunify every object, preserving input order.
    ///
    /// # Errors
    ///
    /// Fails only if the context cannot be resolved; per-object failures
    /// (e.g. a missing required field) are returned in place.
    pub async fn disunify_all(
        &self,
        objects: &[UnifiedObject],
        ctx: &TransformContext,
    ) -> Result<Vec<BatchItem<Value>>, UnifyError> {
        let resolved = self.resolve(ctx).await?;
        Ok(objects
            .iter()
            .enumerate()
            .map(|(index, unified)| match disunify_object(unified, &resolved) {
                Ok(mut out) => {
                    prepend(&mut out.diagnostics, &resolved.diagnostics);
                    BatchItem::Succeeded(out)
                }
                Err(error) => {
                    tracing::warn!(index, %error, "batch item failed");
                    BatchItem::Failed(ItemFailure { index, error })
                }
            })
            .collect())
    }

    async fn unify_prepared(
        &self,
        raw: Value,
        ctx: &ResolvedContext,
        requested: &[String],
    ) -> Result<Transformed<UnifiedObject>, UnifyError> {
        let mut diagnostics = Vec::new();
        let raw = self.resolve_catalog(raw, ctx, &mut diagnostics).await;

        let associations = if requested.is_empty() {
            Vec::new()
        } else {
            let refs = raw.get(ASSOCIATIONS_KEY).cloned().unwrap_or(Value::Null);
            let resolution = self.resolve_associations(&refs, requested, ctx).await;
            diagnostics.extend(resolution.diagnostics);
            resolution.valid_results
        };

        let unified = unify_object(&raw, ctx, associations)?;
        diagnostics.extend(unified.diagnostics);
        Ok(Transformed::new(unified.value, diagnostics))
    }

    /// Unify without following associations; used for related records.
    pub(crate) async fn unify_leaf(&self, raw: Value, ctx: &ResolvedContext) -> Result<Transformed<UnifiedObject>, UnifyError> {
        let mut diagnostics = Vec::new();
        let raw = self.resolve_catalog(raw, ctx, &mut diagnostics).await;
        let unified = unify_object(&raw, ctx, Vec::new())?;
        diagnostics.extend(unified.diagnostics);
        Ok(Transformed::new(unified.value, diagnostics))
    }

    async fn resolve_catalog(&self, raw: Value, ctx: &ResolvedContext, diagnostics: &mut Vec<Diagnostic>) -> Value {
        if !ctx.provider.externalizes_custom_fields() {
            return raw;
        }
        match self.field_catalog(ctx.provider, ctx.object_type).await {
            Ok(Some(catalog)) => resolve_custom_fields(&raw, &catalog),
            Ok(None) => {
                tracing::debug!(provider = %ctx.provider, "no adapter registered; custom field ids left unresolved");
                raw
            }
            Err(error) => {
                tracing::warn!(provider = %ctx.provider, object_type = %ctx.object_type, %error, "field catalog unavailable");
                diagnostics.push(Diagnostic::new(DiagnosticKind::InvalidFieldCatalog, error.to_string()));
                raw
            }
        }
    }

    /// Field catalog for `(provider, object_type)`, from cache or the adapter.
    /// `None` when no adapter is registered for the provider. Concurrent
    /// misses for the same key share one fetch.
    ///
    /// # Errors
    ///
    /// Returns [`UnifyError::Adapter`] if the fetch fails, or
    /// [`UnifyError::InvalidFieldCatalog`] if the catalog cannot be parsed.
    pub async fn field_catalog(
        &self,
        provider: ProviderId,
        object_type: ObjectType,
    ) -> Result<Option<Arc<ProviderFieldCatalog>>, UnifyError> {
        if let Some(catalog) = self.catalogs.get(provider, object_type) {
            return Ok(Some(catalog));
        }
        let Some(adapter) = self.adapters.get(provider) else {
            return Ok(None);
        };
        let lock = self.catalogs.fetch_lock(provider, object_type);
        let _guard = lock.lock().await;
        // another task may have filled the entry while we waited
        if let Some(catalog) = self.catalogs.get(provider, object_type) {
            return Ok(Some(catalog));
        }
        let raw = adapter
            .fetch_field_catalog(object_type)
            .await
            .map_err(|e| e.into_unify(provider))?;
        let catalog = Arc::new(ProviderFieldCatalog::parse(&raw)?);
        tracing::debug!(%provider, %object_type, fields = catalog.len(), "fetched field catalog");
        self.catalogs.insert(provider, object_type, Arc::clone(&catalog));
        Ok(Some(catalog))
    }
}

fn prepend(diagnostics: &mut Vec<Diagnostic>, leading: &[Diagnostic]) {
    if !leading.is_empty() {
        diagnostics.splice(0..0, leading.iter().cloned());
    }
}
