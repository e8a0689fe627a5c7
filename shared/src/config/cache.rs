//! Cache configuration module

use serde::{Deserialize, Serialize};

use super::parse_var;
use super::read_var;
use crate::errors::ConfigResult;

/// Redis store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Maximum number of retry attempts for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (doubled per attempt)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub(crate) fn from_lookup<F>(lookup: &F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            url: read_var(lookup, "REDIS_URL").unwrap_or(defaults.url),
            max_retries: parse_var(lookup, "REDIS_MAX_RETRIES", defaults.max_retries)?,
            retry_delay_ms: parse_var(lookup, "REDIS_RETRY_DELAY_MS", defaults.retry_delay_ms)?,
        })
    }

    /// Set the retry policy
    pub fn with_retries(mut self, max_retries: u32, retry_delay_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_delay_ms = retry_delay_ms;
        self
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::lookup_from;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay_ms, 100);
    }

    #[test]
    fn test_cache_config_builder() {
        let config = CacheConfig::new("redis://cache:6379").with_retries(5, 50);
        assert_eq!(config.url, "redis://cache:6379");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay_ms, 50);
    }

    #[test]
    fn test_cache_config_invalid_retries() {
        let lookup = lookup_from(&[("REDIS_MAX_RETRIES", "-1")]);
        assert!(CacheConfig::from_lookup(&lookup).is_err());
    }
}
