//! # OTP Core
//!
//! Core business logic and domain layer for the OTP service.
//! This crate contains the passcode value objects, the store and dispatcher
//! contracts, the lifecycle manager and the error types the outer layers
//! build on.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
