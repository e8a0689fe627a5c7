//! Store key derivation.

use std::fmt;

/// Store key holding the live code of one identity
///
/// Keys have the form `{prefix}:{identity}`. For a fixed prefix the
/// mapping is injective, so two identities never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtpKey(String);

impl OtpKey {
    /// Derive the key for an identity under a namespace prefix
    pub fn for_identity(prefix: &str, identity: &str) -> Self {
        Self(format!("{}:{}", prefix, identity))
    }

    /// Borrow the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
