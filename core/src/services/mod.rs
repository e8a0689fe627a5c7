//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    Delivery, InvalidReason, IssuedOtp, MessageDispatcher, OtpManager, OtpManagerConfig,
    OtpStore, ValidationOutcome,
};
