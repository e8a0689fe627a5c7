//! Redis client for code storage
//!
//! Wraps a multiplexed async connection with connection and per-command
//! retry using exponential backoff. Only transient errors are retried.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult, Script};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use otp_shared::CacheConfig;

use crate::InfrastructureError;

/// Upper bound for the retry backoff
const MAX_BACKOFF_MS: u64 = 5000;

/// Deletes KEYS[1] only while it still holds ARGV[1]
const COMPARE_AND_DELETE: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
end
return 0
"#;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Whether a command may be sent again after a transient failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryPolicy {
    /// Idempotent command, retried with backoff
    Transient,
    /// Non-idempotent command, sent exactly once
    Never,
}

impl RetryPolicy {
    /// Total attempts allowed under a configured retry budget
    pub(crate) fn attempts(self, max_retries: u32) -> u32 {
        match self {
            RetryPolicy::Transient => max_retries.max(1),
            RetryPolicy::Never => 1,
        }
    }
}

/// Redis client with retry logic
///
/// Cloning is cheap; clones share the multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    config: CacheConfig,
    compare_and_delete: Script,
}

impl RedisClient {
    /// Connect to Redis, retrying the initial connection with backoff
    ///
    /// # Example
    /// ```no_run
    /// use otp_infra::cache::RedisClient;
    /// use otp_shared::CacheConfig;
    ///
    /// async fn connect() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let client = RedisClient::new(CacheConfig::new("redis://localhost:6379")).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::connect_with_retry(&client, config.max_retries, config.retry_delay_ms).await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            config,
            compare_and_delete: Script::new(COMPARE_AND_DELETE),
        })
    }

    async fn connect_with_retry(
        client: &Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Configuration this client was created with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Set a value, replacing any existing one, expiring after `ttl`
    ///
    /// The TTL is sent with millisecond precision (`SET key value PX ms`).
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), InfrastructureError> {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);

        self.execute_with_retry(RetryPolicy::Transient, |mut conn| {
            let key = key.to_string();
            let value = value.to_string();
            Box::pin(async move {
                redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .arg("PX")
                    .arg(ttl_ms)
                    .query_async::<_, ()>(&mut conn)
                    .await
            })
        })
        .await
        .map_err(|e| {
            error!("Failed to set key: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    /// Get a value, `None` when absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        self.execute_with_retry(RetryPolicy::Transient, |mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to get key: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    /// Delete a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let deleted = self
            .execute_with_retry(RetryPolicy::Transient, |mut conn| {
                let key = key.to_string();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to delete key: {}", e);
                InfrastructureError::Cache(e)
            })?;

        Ok(deleted > 0)
    }

    /// Delete a key only while it holds `expected`, atomically on the server
    ///
    /// Sent once: if the reply of an executed script were lost, a retry
    /// would report the key as already gone.
    pub async fn delete_if_equals(
        &self,
        key: &str,
        expected: &str,
    ) -> Result<bool, InfrastructureError> {
        let deleted = self
            .execute_with_retry(RetryPolicy::Never, |mut conn| {
                let script = self.compare_and_delete.clone();
                let key = key.to_string();
                let expected = expected.to_string();
                Box::pin(async move {
                    script
                        .key(key)
                        .arg(expected)
                        .invoke_async::<_, i64>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(|e| {
                error!("Failed to compare-and-delete key: {}", e);
                InfrastructureError::Cache(e)
            })?;

        Ok(deleted > 0)
    }

    /// Remaining time to live in seconds, `None` when missing or persistent
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let ttl = self
            .execute_with_retry(RetryPolicy::Transient, |mut conn| {
                let key = key.to_string();
                Box::pin(async move { conn.ttl::<_, i64>(key).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        Ok((ttl >= 0).then_some(ttl))
    }

    /// Check connectivity with PING
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry(RetryPolicy::Transient, |mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await
            .map_err(|e| {
                error!("Redis health check failed: {}", e);
                InfrastructureError::Cache(e)
            })?;

        if response == "PONG" {
            debug!("Redis health check passed");
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }

    async fn execute_with_retry<F, T>(&self, policy: RetryPolicy, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let max_retries = policy.attempts(self.config.max_retries);
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;

            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn next_delay(delay: u64) -> u64 {
    delay.saturating_mul(2).min(MAX_BACKOFF_MS)
}

/// Whether an error is transient and the command worth retrying
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}
