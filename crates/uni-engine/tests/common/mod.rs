#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use uni_core::{ObjectType, ProviderId};
use uni_engine::{AdapterError, ProviderAdapter};

/// In-memory provider: serves canned records and an optional field catalog.
pub struct MockAdapter {
    provider: ProviderId,
    records: HashMap<(ObjectType, String), Value>,
    catalog: Option<Value>,
    pub catalog_fetches: AtomicUsize,
    pub object_fetches: AtomicUsize,
    /// Field lists passed to each object fetch, in call order.
    pub requested_fields: Mutex<Vec<Vec<String>>>,
}

impl MockAdapter {
    pub fn new(provider: ProviderId) -> Self {
        Self {
            provider,
            records: HashMap::new(),
            catalog: None,
            catalog_fetches: AtomicUsize::new(0),
            object_fetches: AtomicUsize::new(0),
            requested_fields: Mutex::new(Vec::new()),
        }
    }

    pub fn with_record(mut self, object_type: ObjectType, id: &str, record: Value) -> Self {
        self.records.insert((object_type, id.to_string()), record);
        self
    }

    pub fn with_catalog(mut self, catalog: Value) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn catalog_fetch_count(&self) -> usize {
        self.catalog_fetches.load(Ordering::SeqCst)
    }

    pub fn last_requested_fields(&self) -> Vec<String> {
        self.requested_fields.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
    fn provider(&self) -> ProviderId {
        self.provider
    }

    async fn fetch_object(&self, object_type: ObjectType, id: &str, fields: &[String]) -> Result<Value, AdapterError> {
        self.object_fetches.fetch_add(1, Ordering::SeqCst);
        self.requested_fields.lock().unwrap().push(fields.to_vec());
        self.records
            .get(&(object_type, id.to_string()))
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(format!("{object_type} {id}")))
    }

    async fn fetch_field_catalog(&self, object_type: ObjectType) -> Result<Value, AdapterError> {
        self.catalog_fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.catalog
            .clone()
            .ok_or_else(|| AdapterError::Unsupported(format!("no {object_type} catalog")))
    }
}
