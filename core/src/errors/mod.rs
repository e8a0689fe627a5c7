//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export collaborator error types
pub use types::{DispatchError, StoreError};

use thiserror::Error;

/// Errors surfaced by the OTP lifecycle manager
///
/// Mismatched and expired codes are not errors; they are reported through
/// `ValidationOutcome`.
#[derive(Error, Debug)]
pub enum OtpError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Unsupported channel: {channel}")]
    UnsupportedChannel { channel: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("No pending verification code")]
    NotFound { identity: String },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl OtpError {
    /// Whether the caller, not the infrastructure, caused the error
    ///
    /// Boundary layers map these to 4xx responses and everything else to 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OtpError::InvalidInput { .. }
                | OtpError::UnsupportedChannel { .. }
                | OtpError::NotFound { .. }
        )
    }
}

impl From<StoreError> for OtpError {
    fn from(err: StoreError) -> Self {
        OtpError::StoreUnavailable {
            message: err.to_string(),
        }
    }
}

pub type OtpResult<T> = Result<T, OtpError>;
