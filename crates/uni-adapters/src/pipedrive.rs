//! Pipedrive v1 adapter.
//!
//! Pipedrive keys custom field values by a 40-character hash; the matching
//! field-definition list comes from `/{entity}Fields`, which the engine
//! fetches through [`ProviderAdapter::fetch_field_catalog`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use uni_core::{ObjectType, ProviderId};
use uni_engine::{AdapterError, ProviderAdapter};

use crate::{ProviderClient, error::ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://api.pipedrive.com/v1";

#[must_use]
pub const fn object_path(object_type: ObjectType) -> Option<&'static str> {
    match object_type {
        ObjectType::Contact => Some("persons"),
        ObjectType::Company => Some("organizations"),
        ObjectType::Deal => Some("deals"),
        ObjectType::Note => Some("notes"),
        ObjectType::Task => Some("activities"),
        ObjectType::Lead | ObjectType::Event | ObjectType::Message => None,
    }
}

#[must_use]
pub const fn fields_path(object_type: ObjectType) -> Option<&'static str> {
    match object_type {
        ObjectType::Contact => Some("personFields"),
        ObjectType::Company => Some("organizationFields"),
        ObjectType::Deal => Some("dealFields"),
        ObjectType::Note => Some("noteFields"),
        ObjectType::Task => Some("activityFields"),
        ObjectType::Lead | ObjectType::Event | ObjectType::Message => None,
    }
}

#[derive(Debug, Clone)]
pub struct PipedriveAdapter {
    client: ProviderClient,
}

impl PipedriveAdapter {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_base_url(DEFAULT_BASE_URL, token, timeout)
    }

    /// Use a company-specific API domain (`https://acme.pipedrive.com/v1`).
    ///
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
        })
    }

    fn unsupported(object_type: ObjectType) -> ProviderError {
        ProviderError::UnsupportedObject {
            provider: ProviderId::Pipedrive.to_string(),
            object_type: object_type.to_string(),
        }
    }
}

/// Unwrap Pipedrive's `{"success": .., "data": ..}` envelope.
///
/// # Errors
///
/// Returns [`ProviderError::Api`] when `success` is false,
/// [`ProviderError::NotFound`] when `data` is null, and
/// [`ProviderError::Parse`] when there is no envelope.
pub fn unwrap_data(body: Value, what: &str) -> Result<Value, ProviderError> {
    let Value::Object(mut body) = body else {
        return Err(ProviderError::Parse(format!("{what}: response is not an object")));
    };
    if body.get("success") == Some(&Value::Bool(false)) {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        return Err(ProviderError::Api { status: 200, message });
    }
    match body.remove("data") {
        Some(Value::Null) => Err(ProviderError::NotFound(what.to_string())),
        Some(data) => Ok(data),
        None => Err(ProviderError::Parse(format!("{what}: missing data"))),
    }
}

#[async_trait]
impl ProviderAdapter for PipedriveAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Pipedrive
    }

    /// Pipedrive returns every field on a record read, so `fields` is unused.
    async fn fetch_object(&self, object_type: ObjectType, id: &str, _fields: &[String]) -> Result<Value, AdapterError> {
        let segment = object_path(object_type).ok_or_else(|| Self::unsupported(object_type))?;
        let path = format!("{segment}/{}", urlencoding::encode(id));
        let body = self.client.get_json(&path, &[]).await?;
        Ok(unwrap_data(body, &path)?)
    }

    async fn fetch_field_catalog(&self, object_type: ObjectType) -> Result<Value, AdapterError> {
        let path = fields_path(object_type).ok_or_else(|| Self::unsupported(object_type))?;
        let body = self.client.get_json(path, &[]).await?;
        Ok(unwrap_data(body, path)?)
    }
}
