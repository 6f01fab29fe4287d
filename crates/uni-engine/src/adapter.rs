//! Provider adapter capability consumed by the engine.
//!
//! The engine never branches on a provider tag beyond picking the adapter
//! registered for it; HTTP details live in the implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uni_core::{ObjectType, ProviderId, UnifyError};

/// Errors from provider adapters.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl AdapterError {
    /// Lift into the engine taxonomy, tagged with the provider.
    #[must_use]
    pub fn into_unify(self, provider: ProviderId) -> UnifyError {
        UnifyError::Adapter {
            provider: provider.to_string(),
            message: self.to_string(),
        }
    }
}

/// Fetch capability for one provider.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> ProviderId;

    /// Raw provider record for `id`.
    ///
    /// `fields` are the top-level provider keys the caller will read (see
    /// [`ResolvedContext::provider_keys`](crate::ResolvedContext::provider_keys)).
    /// Providers that return every field may ignore them; providers that
    /// return only what is asked for must request at least these.
    async fn fetch_object(&self, object_type: ObjectType, id: &str, fields: &[String]) -> Result<Value, AdapterError>;

    /// Raw field-definition list, for providers that key custom values by
    /// opaque IDs.
    async fn fetch_field_catalog(&self, object_type: ObjectType) -> Result<Value, AdapterError> {
        Err(AdapterError::Unsupported(format!(
            "{} does not publish a {object_type} field catalog",
            self.provider()
        )))
    }
}

/// Adapters keyed by the provider they serve.
#[derive(Clone, Default)]
pub struct AdapterSet {
    adapters: HashMap<ProviderId, Arc<dyn ProviderAdapter>>,
}

impl AdapterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `adapter`, replacing any adapter for the same provider.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.provider(), adapter);
    }

    #[must_use]
    pub fn get(&self, provider: ProviderId) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&provider).cloned()
    }

    #[must_use]
    pub fn providers(&self) -> Vec<ProviderId> {
        let mut providers: Vec<ProviderId> = self.adapters.keys().copied().collect();
        providers.sort_unstable();
        providers
    }
}

impl std::fmt::Debug for AdapterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterSet")
            .field("providers", &self.providers())
            .finish()
    }
}
