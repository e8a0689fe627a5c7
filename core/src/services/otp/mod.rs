//! OTP lifecycle service
//!
//! This module provides the complete passcode workflow:
//! - Code generation and time-bounded storage
//! - Retrieval of the live code for resends
//! - Single-use validation with expiry and mismatch reporting
//! - Channel selection for SMS / WhatsApp / email delivery

mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::OtpManagerConfig;
pub use service::OtpManager;
pub use traits::{MessageDispatcher, OtpStore};
pub use types::{Delivery, InvalidReason, IssuedOtp, ValidationOutcome};
