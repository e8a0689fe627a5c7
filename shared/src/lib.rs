//! Shared utilities and common types for the OTP service
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the process environment
//! - Configuration error types
//! - Log masking helpers for user identities

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, Environment, LogFormat, LoggingConfig, MessagingConfig,
    MessagingProvider, OtpConfig, TwilioCredentials,
};
pub use errors::{ConfigError, ConfigResult};
pub use utils::mask_identity;
