//! Messaging provider configuration
//!
//! Missing Twilio credentials are not an error: dispatch over SMS and
//! WhatsApp is disabled while generation and validation keep working.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{parse_var, read_var};
use crate::errors::{ConfigError, ConfigResult};

/// Outbound messaging provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagingProvider {
    /// Twilio Programmable Messaging (SMS and WhatsApp)
    Twilio,
    /// Log-only provider for development
    Mock,
}

impl Default for MessagingProvider {
    fn default() -> Self {
        MessagingProvider::Twilio
    }
}

impl fmt::Display for MessagingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagingProvider::Twilio => write!(f, "twilio"),
            MessagingProvider::Mock => write!(f, "mock"),
        }
    }
}

impl FromStr for MessagingProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "twilio" => Ok(MessagingProvider::Twilio),
            "mock" => Ok(MessagingProvider::Mock),
            _ => Err(format!("Invalid messaging provider: {}", s)),
        }
    }
}

/// Twilio account credentials
#[derive(Clone, Deserialize, Serialize)]
pub struct TwilioCredentials {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token, never serialized
    #[serde(skip_serializing)]
    pub auth_token: String,
    /// Sender number in E.164 format (must be a Twilio number)
    pub from_number: String,
}

// Auth token stays out of debug output
impl fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"****")
            .field("from_number", &self.from_number)
            .finish()
    }
}

/// Messaging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessagingConfig {
    /// Selected provider
    #[serde(default)]
    pub provider: MessagingProvider,

    /// Twilio credentials, `None` when any of them is missing
    #[serde(default)]
    pub twilio: Option<TwilioCredentials>,

    /// Maximum send attempts per message
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial retry delay in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            provider: MessagingProvider::default(),
            twilio: None,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl MessagingConfig {
    pub(crate) fn from_lookup<F>(lookup: &F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match read_var(lookup, "MESSAGING_PROVIDER") {
            Some(raw) => raw
                .parse()
                .map_err(|reason: String| ConfigError::invalid("MESSAGING_PROVIDER", &raw, reason))?,
            None => MessagingProvider::default(),
        };

        let twilio = match (
            read_var(lookup, "TWILIO_ACCOUNT_SID"),
            read_var(lookup, "TWILIO_AUTH_TOKEN"),
            read_var(lookup, "TWILIO_FROM_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => {
                if !from_number.starts_with('+') {
                    return Err(ConfigError::invalid(
                        "TWILIO_FROM_NUMBER",
                        &from_number,
                        "must be in E.164 format (starting with '+')",
                    ));
                }
                Some(TwilioCredentials {
                    account_sid,
                    auth_token,
                    from_number,
                })
            }
            _ => None,
        };

        Ok(Self {
            provider,
            twilio,
            max_retries: parse_var(lookup, "TWILIO_MAX_RETRIES", default_max_retries())?,
            retry_delay_ms: parse_var(lookup, "TWILIO_RETRY_DELAY_MS", default_retry_delay_ms())?,
        })
    }

    /// Whether SMS / WhatsApp dispatch can be performed
    pub fn dispatch_enabled(&self) -> bool {
        match self.provider {
            MessagingProvider::Mock => true,
            MessagingProvider::Twilio => self.twilio.is_some(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}
