//! Types for OTP service results

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Channel, OtpCode};
use crate::errors::DispatchError;

/// Result of issuing a code
///
/// Generation and delivery are independent: a failed delivery is recorded
/// in `delivery` and the stored code stays valid.
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    /// Identity the code was issued for
    pub identity: String,
    /// The generated code
    pub code: OtpCode,
    /// Requested delivery channel
    pub channel: Channel,
    /// When the store will evict the code (informational only)
    pub expires_at: DateTime<Utc>,
    /// What happened when delivering the code
    pub delivery: Delivery,
}

/// Outcome of delivering a code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The provider accepted the message
    Sent { message_id: String },
    /// Nothing was sent for this channel
    Skipped { channel: Channel, reason: String },
    /// The provider rejected the message or could not be reached
    Failed(DispatchError),
}

impl Delivery {
    /// Whether a message was handed to the provider
    pub fn is_sent(&self) -> bool {
        matches!(self, Delivery::Sent { .. })
    }
}

/// Result of validating a submitted code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ValidationOutcome {
    Valid,
    Invalid(InvalidReason),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

/// Why a submitted code was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// No live code for the identity (never issued, expired or consumed)
    Expired,
    /// A live code exists but differs from the submission
    Mismatch,
    /// The store could not be read
    ServerError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(
            serde_json::to_string(&ValidationOutcome::Valid).unwrap(),
            r#"{"status":"valid"}"#
        );
        assert_eq!(
            serde_json::to_string(&ValidationOutcome::Invalid(InvalidReason::ServerError)).unwrap(),
            r#"{"status":"invalid","reason":"server_error"}"#
        );
    }
}
