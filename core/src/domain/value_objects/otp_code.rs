//! One-time passcode value object.

use rand::{rngs::OsRng, Rng};
use std::fmt;

/// Length of a passcode
pub const CODE_LENGTH: usize = 6;

/// Size of the code space, codes are drawn from `[0, CODE_SPACE)`
const CODE_SPACE: u32 = 1_000_000;

/// A 6-digit, zero-padded numeric passcode
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtpCode(String);

impl OtpCode {
    /// Generate a cryptographically secure random code
    ///
    /// Uses `OsRng` (OS-provided CSPRNG). `gen_range` rejects out-of-zone
    /// samples, so every value in 000000..=999999 is equally likely.
    pub fn generate() -> Self {
        let value = OsRng.gen_range(0..CODE_SPACE);
        Self(format!("{:06}", value))
    }

    /// Parse a stored or submitted code, accepting exactly 6 ASCII digits
    pub fn parse(value: &str) -> Option<Self> {
        if value.len() == CODE_LENGTH && value.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    /// Borrow the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the value object and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OtpCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
