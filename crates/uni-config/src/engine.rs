//! Engine tuning knobs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_batch_concurrency() -> usize {
    8
}

const fn default_batch_timeout_secs() -> u64 {
    60
}

const fn default_catalog_cache_ttl_secs() -> u64 {
    300
}

const fn default_fetch_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Maximum number of batch items transformed concurrently.
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,

    /// Deadline for a whole batch; 0 disables it.
    #[serde(default = "default_batch_timeout_secs")]
    pub batch_timeout_secs: u64,

    /// How long a provider field catalog is reused; 0 fetches every time.
    #[serde(default = "default_catalog_cache_ttl_secs")]
    pub catalog_cache_ttl_secs: u64,

    /// Per-request timeout for provider adapters.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_concurrency: default_batch_concurrency(),
            batch_timeout_secs: default_batch_timeout_secs(),
            catalog_cache_ttl_secs: default_catalog_cache_ttl_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn batch_timeout(&self) -> Option<Duration> {
        if self.batch_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.batch_timeout_secs))
        }
    }

    #[must_use]
    pub const fn catalog_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_cache_ttl_secs)
    }

    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `batch_concurrency` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.batch_concurrency".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
