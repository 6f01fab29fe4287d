use std::sync::Arc;

use anyhow::Context;
use uni_adapters::{HubspotAdapter, PipedriveAdapter};
use uni_config::{TomlMappingStore, UnifyConfig};
use uni_engine::Engine;

pub fn load_config() -> anyhow::Result<UnifyConfig> {
    UnifyConfig::load_with_dotenv().context("failed to load unify configuration")
}

/// Engine over the configured mapping directory, with an HTTP adapter for
/// every provider that has credentials.
pub fn build_engine(config: &UnifyConfig) -> anyhow::Result<Engine> {
    let dir = config.mappings.dir_path();
    let store = TomlMappingStore::open(&dir)
        .with_context(|| format!("failed to load mapping documents from {}", dir.display()))?;
    tracing::debug!(
        dir = %dir.display(),
        tenants = store.tenant_mapping_ids().len(),
        "mapping store ready"
    );

    let mut builder = Engine::builder()
        .mapping_store(Arc::new(store))
        .config(config.engine.clone());

    let timeout = config.engine.fetch_timeout();
    let providers = &config.providers;

    if providers.hubspot_configured() {
        let adapter = match providers.hubspot_base_url() {
            Some(base_url) => HubspotAdapter::with_base_url(base_url, &providers.hubspot_token, timeout),
            None => HubspotAdapter::new(&providers.hubspot_token, timeout),
        }
        .context("failed to build HubSpot client")?;
        builder = builder.adapter(Arc::new(adapter));
    }

    if providers.pipedrive_configured() {
        let adapter = match providers.pipedrive_base_url() {
            Some(base_url) => PipedriveAdapter::with_base_url(base_url, &providers.pipedrive_token, timeout),
            None => PipedriveAdapter::new(&providers.pipedrive_token, timeout),
        }
        .context("failed to build Pipedrive client")?;
        builder = builder.adapter(Arc::new(adapter));
    }

    Ok(builder.build())
}
