//! Mock dispatcher for development and testing
//!
//! Logs messages instead of sending them and keeps them for inspection.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use otp_core::{DispatchError, MessageDispatcher};
use otp_shared::mask_identity;

/// A message captured by `MockDispatcher`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMessage {
    /// `sms` or `whatsapp`
    pub channel: &'static str,
    pub to: String,
    pub body: String,
    pub message_id: String,
}

/// Mock dispatcher recording every message it is asked to send
#[derive(Clone, Default)]
pub struct MockDispatcher {
    message_count: Arc<AtomicU64>,
    simulate_failure: Arc<AtomicBool>,
    messages: Arc<Mutex<Vec<RecordedMessage>>>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages sent so far
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Make subsequent sends fail with a 503
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Messages sent so far, oldest first
    pub async fn messages(&self) -> Vec<RecordedMessage> {
        self.messages.lock().await.clone()
    }

    /// Most recent message sent to `to`
    pub async fn last_message_to(&self, to: &str) -> Option<RecordedMessage> {
        self.messages
            .lock()
            .await
            .iter()
            .rev()
            .find(|m| m.to == to)
            .cloned()
    }

    async fn record(
        &self,
        channel: &'static str,
        to: &str,
        body: &str,
    ) -> Result<String, DispatchError> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(to = %mask_identity(to), channel, "Mock dispatcher simulating failure");
            return Err(DispatchError::new("Simulated provider failure").with_status(503));
        }

        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        let message_id = format!("mock-{}-{:06}", channel, count);

        info!(
            to = %mask_identity(to),
            channel,
            message_id = %message_id,
            "Mock message sent"
        );

        self.messages.lock().await.push(RecordedMessage {
            channel,
            to: to.to_string(),
            body: body.to_string(),
            message_id: message_id.clone(),
        });

        Ok(message_id)
    }
}

#[async_trait]
impl MessageDispatcher for MockDispatcher {
    async fn send_sms(&self, to: &str, body: &str) -> Result<String, DispatchError> {
        self.record("sms", to, body).await
    }

    async fn send_whatsapp(&self, to: &str, body: &str) -> Result<String, DispatchError> {
        self.record("whatsapp", to, body).await
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
