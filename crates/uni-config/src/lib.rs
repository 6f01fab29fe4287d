//! # uni-config
//!
//! Layered configuration loading for the unification engine using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`UNIFY_*` prefix, `__` as separator)
//! 2. Project-level `.unify/config.toml`
//! 3. User-level `~/.config/unify/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `UNIFY_ENGINE__BATCH_CONCURRENCY` -> `engine.batch_concurrency`,
//! `UNIFY_MAPPINGS__DIR` -> `mappings.dir`,
//! `UNIFY_PROVIDERS__HUBSPOT_TOKEN` -> `providers.hubspot_token`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use uni_config::{TomlMappingStore, UnifyConfig};
//!
//! let config = UnifyConfig::load_with_dotenv().expect("config");
//! let store = TomlMappingStore::open(&config.mappings.dir_path()).expect("mappings");
//! println!("batch concurrency: {}", config.engine.batch_concurrency);
//! ```

mod engine;
mod error;
mod mappings;
mod providers;

pub use engine::EngineConfig;
pub use error::ConfigError;
pub use mappings::{MappingsConfig, TomlMappingStore};
pub use providers::ProvidersConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UnifyConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub mappings: MappingsConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl UnifyConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`load_with_dotenv`](Self::load_with_dotenv)
    /// if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and validate from an explicit figment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".unify/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("UNIFY_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("unify").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
