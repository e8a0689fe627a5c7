//! Configuration for the OTP lifecycle manager

use std::time::Duration;

use otp_shared::config::otp::{OtpConfig, DEFAULT_KEY_PREFIX, DEFAULT_TTL_SECONDS};

use crate::domain::OtpCode;

/// Configuration for the OTP lifecycle manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpManagerConfig {
    /// Lifetime of a stored code
    pub ttl: Duration,
    /// Namespace prefix for store keys
    pub key_prefix: String,
    /// Delete a code once it validates successfully
    pub consume_on_success: bool,
}

impl Default for OtpManagerConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            consume_on_success: true,
        }
    }
}

impl From<&OtpConfig> for OtpManagerConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            ttl: config.ttl(),
            key_prefix: config.key_prefix.clone(),
            consume_on_success: config.consume_on_success,
        }
    }
}

impl OtpManagerConfig {
    /// Code lifetime in whole minutes, rounded up, never below one
    pub fn ttl_minutes(&self) -> u64 {
        let secs = self
            .ttl
            .as_secs()
            .saturating_add(u64::from(self.ttl.subsec_nanos() > 0));
        secs.div_ceil(60).max(1)
    }

    /// Render the delivery message for a code
    pub fn message_for(&self, code: &OtpCode) -> String {
        format!(
            "Your verification code is: {}. It will expire in {} minutes.",
            code,
            self.ttl_minutes()
        )
    }
}
