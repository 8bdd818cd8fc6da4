//! Enrichment Configuration

use std::time::Duration;

use platform::config::{ConfigError, env_or};

#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Total budget for one page fetch
    pub fetch_timeout: Duration,
    /// Body bytes read before the rest is discarded
    pub max_body_bytes: usize,
    /// Jobs waiting beyond this are dropped
    pub queue_capacity: usize,
    /// Fetches running at once
    pub max_concurrency: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            max_body_bytes: 1024 * 1024, // 1 MiB
            queue_capacity: 256,
            max_concurrency: 4,
        }
    }
}

impl EnrichmentConfig {
    /// Read `ENRICH_*` variables, falling back to the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            fetch_timeout: Duration::from_secs(env_or(
                "ENRICH_FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout.as_secs(),
            )?),
            max_body_bytes: env_or("ENRICH_MAX_BODY_BYTES", defaults.max_body_bytes)?,
            queue_capacity: env_or("ENRICH_QUEUE_CAPACITY", defaults.queue_capacity)?,
            max_concurrency: env_or("ENRICH_MAX_CONCURRENCY", defaults.max_concurrency)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("ENRICH_FETCH_TIMEOUT_SECS", self.fetch_timeout.as_secs() as usize),
            ("ENRICH_MAX_BODY_BYTES", self.max_body_bytes),
            ("ENRICH_QUEUE_CAPACITY", self.queue_capacity),
            ("ENRICH_MAX_CONCURRENCY", self.max_concurrency),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key: key.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}
