//! # uni-adapters
//!
//! HTTP provider adapters for the unification engine.
//!
//! Each adapter implements [`uni_engine::ProviderAdapter`] over a provider's
//! REST API:
//! - HubSpot CRM v3 (`/crm/v3/objects/...`, associations returned inline)
//! - Pipedrive v1 (`/v1/persons/...`, custom fields keyed by hash and
//!   published through `/v1/personFields` and friends)
//!
//! Adapters only fetch; field mapping and coercion happen in the engine.

pub mod hubspot;
pub mod pipedrive;

mod error;
mod http;

pub use error::ProviderError;
pub use hubspot::HubspotAdapter;
pub use pipedrive::PipedriveAdapter;

use std::time::Duration;

use serde_json::Value;

use crate::http::check_response;

/// Authenticated HTTP client shared by the adapters.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ProviderClient {
    /// Create a client for `base_url` using bearer `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("unify/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path` (leading slash optional) with encoded query
    /// pairs.
    #[must_use]
    pub fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// GET `path` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request fails, the provider returns a
    /// non-success status, or the body is not JSON.
    pub async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let url = self.url(path, query);
        tracing::debug!(%url, "provider GET");
        let resp = self.http.get(&url).bearer_auth(&self.token).send().await?;
        let resp = check_response(resp).await?;
        resp.json::<Value>()
            .await
            .map_err(|e| ProviderError::Parse(format!("{url}: {e}")))
    }
}
