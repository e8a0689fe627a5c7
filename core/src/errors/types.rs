//! Error types returned by the store and dispatcher collaborators

use thiserror::Error;

/// Infrastructure failure reported by an `OtpStore`
///
/// A missing key is not an error; stores report it as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Delivery failure reported by a `MessageDispatcher`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Message dispatch failed: {message}")]
pub struct DispatchError {
    /// HTTP status returned by the provider, when one was received
    pub status: Option<u16>,
    /// Provider or transport error message
    pub message: String,
}

impl DispatchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Attach the provider's HTTP status
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// No dispatcher is configured for SMS / WhatsApp delivery
    pub fn not_configured() -> Self {
        Self::new("messaging provider not configured")
    }
}
