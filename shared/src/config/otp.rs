//! OTP lifecycle configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{parse_flag, parse_var, read_var};
use crate::errors::{ConfigError, ConfigResult};

/// Default code lifetime (10 minutes)
pub const DEFAULT_TTL_SECONDS: u64 = 600;

/// Longest accepted code lifetime (30 days)
pub const MAX_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;

/// Default namespace for store keys
pub const DEFAULT_KEY_PREFIX: &str = "otp";

/// Code lifetime, key namespace and consumption policy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Lifetime of a stored code in seconds
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Prefix for store keys (`{prefix}:{identity}`)
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Delete a code once it validates successfully
    #[serde(default = "default_consume_on_success")]
    pub consume_on_success: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            key_prefix: default_key_prefix(),
            consume_on_success: default_consume_on_success(),
        }
    }
}

impl OtpConfig {
    pub(crate) fn from_lookup<F>(lookup: &F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ttl_seconds = parse_var(lookup, "OTP_TTL_SECONDS", DEFAULT_TTL_SECONDS)?;
        if ttl_seconds == 0 {
            return Err(ConfigError::invalid(
                "OTP_TTL_SECONDS",
                "0",
                "must be greater than zero",
            ));
        }
        if ttl_seconds > MAX_TTL_SECONDS {
            return Err(ConfigError::invalid(
                "OTP_TTL_SECONDS",
                &ttl_seconds.to_string(),
                format!("must not exceed {} seconds", MAX_TTL_SECONDS),
            ));
        }

        Ok(Self {
            ttl_seconds,
            key_prefix: read_var(lookup, "OTP_KEY_PREFIX").unwrap_or_else(default_key_prefix),
            consume_on_success: parse_flag(lookup, "OTP_CONSUME_ON_SUCCESS", true)?,
        })
    }

    /// Code lifetime as a `Duration`, clamped to `1..=MAX_TTL_SECONDS`
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds.clamp(1, MAX_TTL_SECONDS))
    }

    /// Set the code lifetime, clamped to `1..=MAX_TTL_SECONDS`
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_seconds = ttl.as_secs().clamp(1, MAX_TTL_SECONDS);
        self
    }

    /// Enable or disable delete-on-success
    pub fn with_consume_on_success(mut self, consume: bool) -> Self {
        self.consume_on_success = consume;
        self
    }
}

fn default_ttl_seconds() -> u64 {
    DEFAULT_TTL_SECONDS
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

fn default_consume_on_success() -> bool {
    true
}
