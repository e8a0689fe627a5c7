//! Mock implementations for testing the OTP manager

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use crate::errors::{DispatchError, StoreError};
use crate::services::otp::traits::{MessageDispatcher, OtpStore};

// Mock store honouring TTLs on tokio's clock, so paused-time tests can expire entries
#[derive(Default)]
pub struct MockStore {
    pub entries: Mutex<HashMap<String, (String, Instant)>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub calls: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_reads() -> Self {
        let store = Self::new();
        store.fail_reads.store(true, Ordering::SeqCst);
        store
    }

    pub fn failing_writes() -> Self {
        let store = Self::new();
        store.fail_writes.store(true, Ordering::SeqCst);
        store
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(value, _)| value.clone())
    }

    pub fn insert_raw(&self, key: &str, value: &str, ttl: Duration) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
    }
}

#[async_trait]
impl OtpStore for MockStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::new("Store write error"));
        }
        self.insert_raw(key, value, ttl);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::new("Store read error"));
        }
        Ok(self.raw(key))
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::new("Store delete error"));
        }
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::new("Store delete error"));
        }
        let mut entries = self.entries.lock().unwrap();
        let live = entries
            .get(key)
            .map(|(value, expires_at)| value == expected && *expires_at > Instant::now())
            .unwrap_or(false);
        if live {
            entries.remove(key);
        }
        Ok(live)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel: &'static str,
    pub to: String,
    pub body: String,
}

// Mock dispatcher recording every message
#[derive(Default)]
pub struct MockDispatcher {
    pub sent: Arc<Mutex<Vec<SentMessage>>>,
    pub failure: Option<DispatchError>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: DispatchError) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failure: Some(error),
        }
    }

    pub fn messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, channel: &'static str, to: &str, body: &str) -> Result<String, DispatchError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentMessage {
            channel,
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(format!("mock-msg-{}", sent.len()))
    }
}

#[async_trait]
impl MessageDispatcher for MockDispatcher {
    async fn send_sms(&self, to: &str, body: &str) -> Result<String, DispatchError> {
        self.record("sms", to, body)
    }

    async fn send_whatsapp(&self, to: &str, body: &str) -> Result<String, DispatchError> {
        self.record("whatsapp", to, body)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
