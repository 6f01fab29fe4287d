//! HubSpot CRM v3 adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uni_core::{ObjectType, ProviderId};
use uni_engine::{AdapterError, ProviderAdapter};
use uni_schema::CanonicalRegistry;

use crate::{ProviderClient, error::ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";

/// CRM object path segment for an object type.
#[must_use]
pub const fn object_path(object_type: ObjectType) -> Option<&'static str> {
    match object_type {
        ObjectType::Contact => Some("contacts"),
        ObjectType::Company => Some("companies"),
        ObjectType::Deal => Some("deals"),
        ObjectType::Note => Some("notes"),
        ObjectType::Task => Some("tasks"),
        ObjectType::Event => Some("meetings"),
        ObjectType::Lead | ObjectType::Message => None,
    }
}

/// Fetches CRM records with their association ids inline.
#[derive(Debug, Clone)]
pub struct HubspotAdapter {
    client: ProviderClient,
    registry: CanonicalRegistry,
}

impl HubspotAdapter {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_base_url(DEFAULT_BASE_URL, token, timeout)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: ProviderClient::new(base_url, token, timeout)?,
            registry: CanonicalRegistry::builtin(),
        })
    }

    /// HubSpot only returns the properties it is asked for: the layout's
    /// default keys plus whatever the caller's mapping reads.
    fn requested_properties(&self, object_type: ObjectType, fields: &[String]) -> String {
        let mut properties: Vec<&str> = self
            .registry
            .layout(ProviderId::Hubspot, object_type)
            .map(|layout| layout.keys.iter().map(|(_, key)| *key).collect())
            .unwrap_or_default();
        properties.extend(fields.iter().map(String::as_str));
        properties.retain(|key| *key != "id");
        let mut seen = std::collections::HashSet::new();
        properties.retain(|key| seen.insert(*key));
        properties.join(",")
    }

    fn requested_associations(&self, object_type: ObjectType) -> String {
        self.registry
            .association_whitelist(object_type)
            .iter()
            .filter_map(|name| name.parse::<ObjectType>().ok())
            .filter_map(object_path)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Path and query for a single-record read asking for `fields` on top
    /// of the default properties.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnsupportedObject`] for object types HubSpot
    /// has no CRM endpoint for.
    pub fn record_request(
        &self,
        object_type: ObjectType,
        id: &str,
        fields: &[String],
    ) -> Result<(String, Vec<(&'static str, String)>), ProviderError> {
        let segment = object_path(object_type).ok_or_else(|| ProviderError::UnsupportedObject {
            provider: ProviderId::Hubspot.to_string(),
            object_type: object_type.to_string(),
        })?;
        let mut query = vec![("properties", self.requested_properties(object_type, fields))];
        let associations = self.requested_associations(object_type);
        if !associations.is_empty() {
            query.push(("associations", associations));
        }
        Ok((
            format!("crm/v3/objects/{segment}/{}", urlencoding::encode(id)),
            query,
        ))
    }
}

/// Rename HubSpot association keys to canonical plurals (`meetings` ->
/// `events`).
#[must_use]
pub fn normalize_associations(mut record: Value) -> Value {
    if let Some(Value::Object(associations)) = record.get_mut("associations") {
        let renamed: Map<String, Value> = std::mem::take(associations)
            .into_iter()
            .map(|(key, value)| {
                let canonical = ObjectType::ALL
                    .iter()
                    .find(|ot| object_path(**ot) == Some(key.as_str()))
                    .map_or(key, |ot| ot.plural().to_string());
                (canonical, value)
            })
            .collect();
        *associations = renamed;
    }
    record
}

#[async_trait]
impl ProviderAdapter for HubspotAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Hubspot
    }

    async fn fetch_object(&self, object_type: ObjectType, id: &str, fields: &[String]) -> Result<Value, AdapterError> {
        let (path, query) = self.record_request(object_type, id, fields)?;
        let query: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let record = self.client.get_json(&path, &query).await?;
        Ok(normalize_associations(record))
    }
}
