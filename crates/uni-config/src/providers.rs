//! Provider API credentials for the HTTP adapters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvidersConfig {
    /// HubSpot private app access token.
    #[serde(default)]
    pub hubspot_token: String,

    /// Override for the HubSpot API host (sandboxes, proxies).
    #[serde(default)]
    pub hubspot_base_url: String,

    /// Pipedrive personal API token.
    #[serde(default)]
    pub pipedrive_token: String,

    /// Company domain API root, e.g. `https://acme.pipedrive.com/v1`.
    #[serde(default)]
    pub pipedrive_base_url: String,
}

impl ProvidersConfig {
    #[must_use]
    pub fn hubspot_configured(&self) -> bool {
        !self.hubspot_token.is_empty()
    }

    #[must_use]
    pub fn pipedrive_configured(&self) -> bool {
        !self.pipedrive_token.is_empty()
    }

    /// Base URL override for HubSpot, if one is set.
    #[must_use]
    pub fn hubspot_base_url(&self) -> Option<&str> {
        non_empty(&self.hubspot_base_url)
    }

    /// Base URL override for Pipedrive, if one is set.
    #[must_use]
    pub fn pipedrive_base_url(&self) -> Option<&str> {
        non_empty(&self.pipedrive_base_url)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
