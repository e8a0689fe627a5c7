//! Value objects representing immutable domain concepts.

pub mod channel;
pub mod otp_code;
pub mod otp_key;

// Re-export commonly used types
pub use channel::Channel;
pub use otp_code::{OtpCode, CODE_LENGTH};
pub use otp_key::OtpKey;
