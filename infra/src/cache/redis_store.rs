//! Redis-backed `OtpStore`

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use otp_core::{OtpStore, StoreError};

use super::redis_client::RedisClient;

/// Code store on Redis, expiry handled by Redis key TTLs
#[derive(Clone)]
pub struct RedisOtpStore {
    client: RedisClient,
}

impl RedisOtpStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Underlying Redis client
    pub fn client(&self) -> &RedisClient {
        &self.client
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        debug!(ttl_ms = ttl.as_millis() as u64, "Storing code in Redis");
        Ok(self.client.set_with_expiry(key, value, ttl).await?)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.client.get(key).await?)
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.client.delete(key).await?)
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, StoreError> {
        Ok(self.client.delete_if_equals(key, expected).await?)
    }
}
