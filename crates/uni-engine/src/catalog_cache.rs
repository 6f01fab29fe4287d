//! Short-lived cache of provider field catalogs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use uni_core::{ObjectType, ProviderId};

use crate::custom_fields::ProviderFieldCatalog;

type Entry = (Instant, Arc<ProviderFieldCatalog>);

/// Catalogs keyed by (provider, object type), each kept for `ttl`.
///
/// A zero TTL disables caching.
#[derive(Debug)]
pub struct CatalogCache {
    ttl: Duration,
    entries: Mutex<HashMap<(ProviderId, ObjectType), Entry>>,
    fetches: Mutex<HashMap<(ProviderId, ObjectType), Arc<tokio::sync::Mutex<()>>>>,
}

impl CatalogCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            fetches: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn get(&self, provider: ProviderId, object_type: ObjectType) -> Option<Arc<ProviderFieldCatalog>> {
        if self.ttl.is_zero() {
            return None;
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(&(provider, object_type)) {
            Some((fetched_at, catalog)) if fetched_at.elapsed() < self.ttl => Some(Arc::clone(catalog)),
            Some(_) => {
                entries.remove(&(provider, object_type));
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, provider: ProviderId, object_type: ObjectType, catalog: Arc<ProviderFieldCatalog>) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((provider, object_type), (Instant::now(), catalog));
    }

    /// Lock serializing catalog fetches for one key. Hold it across the
    /// re-check, fetch and insert so concurrent misses fetch once.
    #[must_use]
    pub fn fetch_lock(&self, provider: ProviderId, object_type: ObjectType) -> Arc<tokio::sync::Mutex<()>> {
        let mut fetches = self.fetches.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(fetches.entry((provider, object_type)).or_default())
    }
}
