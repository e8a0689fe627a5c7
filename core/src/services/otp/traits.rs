//! Traits for store and messaging integration

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::{DispatchError, StoreError};

/// Key-value store with per-key expiry
///
/// Implementations must make each single-key operation atomic. Expiry is
/// entirely the store's job: an expired key behaves like a missing key.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store `value` under `key`, replacing any existing entry, evicted after `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Read the value under `key`, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove `key`, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Atomically remove `key` only if it currently holds `expected`
    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, StoreError>;
}

/// Outbound messaging provider
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    /// Send a text message, returning the provider's message id
    async fn send_sms(&self, to: &str, body: &str) -> Result<String, DispatchError>;

    /// Send a WhatsApp message, returning the provider's message id
    async fn send_whatsapp(&self, to: &str, body: &str) -> Result<String, DispatchError>;

    /// Name of the provider, for logs
    fn provider_name(&self) -> &str;
}
