//! Configuration module with service-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Redis connection configuration for the code store
//! - `environment` - Environment detection and logging configuration
//! - `messaging` - Messaging provider selection and Twilio credentials
//! - `otp` - Code lifetime, key namespace and consumption policy
//!
//! Every loader reads through a lookup function so the same parsing runs
//! against the process environment (`from_env`) and against fixed maps in
//! tests (`from_lookup`).

pub mod cache;
pub mod environment;
pub mod messaging;
pub mod otp;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{ConfigError, ConfigResult};

// Re-export commonly used types
pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use messaging::{MessagingConfig, MessagingProvider, TwilioCredentials};
pub use otp::OtpConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Redis store configuration
    pub cache: CacheConfig,

    /// OTP lifecycle configuration
    pub otp: OtpConfig,

    /// Messaging provider configuration
    pub messaging: MessagingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            cache: CacheConfig::default(),
            otp: OtpConfig::default(),
            messaging: MessagingConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(&lookup);
        Ok(Self {
            environment,
            cache: CacheConfig::from_lookup(&lookup)?,
            otp: OtpConfig::from_lookup(&lookup)?,
            messaging: MessagingConfig::from_lookup(&lookup)?,
            logging: LoggingConfig::from_lookup(environment, &lookup)?,
        })
    }
}

/// Read a trimmed, non-empty value for `key`
pub(crate) fn read_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read and parse `key`, falling back to `default` when unset
pub(crate) fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> ConfigResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match read_var(lookup, key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::invalid(key, &raw, "could not be parsed")),
        None => Ok(default),
    }
}

/// Read a boolean flag accepting `true/false`, `1/0`, `yes/no`, `on/off`
pub(crate) fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> ConfigResult<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match read_var(lookup, key) {
        Some(raw) => match raw.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::invalid(key, &raw, "expected a boolean")),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: std::collections::HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults_from_empty_environment() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.cache.url, "redis://localhost:6379");
        assert_eq!(config.otp.ttl_seconds, 600);
        assert!(config.otp.consume_on_success);
        assert!(config.messaging.twilio.is_none());
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_app_config_reads_overrides() {
        let lookup = lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("REDIS_URL", "redis://cache:6380/2"),
            ("OTP_TTL_SECONDS", "120"),
            ("OTP_CONSUME_ON_SUCCESS", "no"),
            ("TWILIO_ACCOUNT_SID", "ACtest"),
            ("TWILIO_AUTH_TOKEN", "secret"),
            ("TWILIO_FROM_NUMBER", "+15551234567"),
        ]);
        let config = AppConfig::from_lookup(lookup).unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.cache.url, "redis://cache:6380/2");
        assert_eq!(config.otp.ttl_seconds, 120);
        assert!(!config.otp.consume_on_success);
        assert!(config.messaging.twilio.is_some());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        let lookup = lookup_from(&[("OTP_TTL_SECONDS", "ten")]);
        let err = parse_var::<_, u64>(&lookup, "OTP_TTL_SECONDS", 600).unwrap_err();
        assert!(err.to_string().contains("OTP_TTL_SECONDS"));
    }

    #[test]
    fn test_parse_flag_variants() {
        let lookup = lookup_from(&[("A", "ON"), ("B", "0"), ("C", "maybe")]);
        assert!(parse_flag(&lookup, "A", false).unwrap());
        assert!(!parse_flag(&lookup, "B", true).unwrap());
        assert!(parse_flag(&lookup, "C", true).is_err());
        assert!(parse_flag(&lookup, "D", true).unwrap());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let lookup = lookup_from(&[("OTP_TTL_SECONDS", "   ")]);
        assert_eq!(parse_var(&lookup, "OTP_TTL_SECONDS", 600u64).unwrap(), 600);
    }
}
