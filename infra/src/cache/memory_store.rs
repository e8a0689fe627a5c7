//! In-process `OtpStore` for development and tests
//!
//! Entries expire on tokio's clock, so tests running with a paused clock
//! can drive expiry with `tokio::time::advance`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use otp_core::{OtpStore, StoreError};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// In-memory code store with per-key expiry
///
/// Every operation runs under one lock, which makes `delete_if_equals`
/// atomic with respect to concurrent callers.
#[derive(Debug, Default)]
pub struct MemoryOtpStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries.values().filter(|e| e.is_live(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop expired entries, returning how many were removed
    ///
    /// `set` already sweeps on every write; this is for callers that want
    /// memory back without writing.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().await;
        purge_locked(&mut entries, Instant::now())
    }
}

fn purge_locked(entries: &mut HashMap<String, Entry>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| entry.is_live(now));
    let purged = before - entries.len();
    if purged > 0 {
        debug!(purged, "Purged expired codes");
    }
    purged
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| StoreError::new("TTL out of range"))?;

        let mut entries = self.entries.lock().await;
        purge_locked(&mut entries, now);
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        let removed = self.entries.lock().await.remove(key);
        Ok(removed.map_or(false, |entry| entry.is_live(now)))
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        let matches = entries
            .get(key)
            .map_or(false, |entry| entry.is_live(now) && entry.value == expected);
        if matches {
            entries.remove(key);
        }
        Ok(matches)
    }
}
