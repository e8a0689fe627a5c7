//! Messaging providers
//!
//! Implementations of `MessageDispatcher` for SMS and WhatsApp delivery,
//! and the factory that picks one from configuration.

use std::sync::Arc;

use otp_core::MessageDispatcher;
use otp_shared::{MessagingConfig, MessagingProvider};

pub mod mock;

// Twilio dispatcher (feature-gated)
#[cfg(feature = "twilio-sms")]
pub mod twilio;

pub use mock::{MockDispatcher, RecordedMessage};

#[cfg(feature = "twilio-sms")]
pub use twilio::{TwilioConfig, TwilioDispatcher};


/// Create the dispatcher selected by configuration
///
/// Returns `None` when the selected provider cannot be used, e.g. missing
/// Twilio credentials. The OTP manager then still generates and validates
/// codes but reports SMS / WhatsApp delivery as failed.
pub fn create_dispatcher(config: &MessagingConfig) -> Option<Arc<dyn MessageDispatcher>> {
    match config.provider {
        MessagingProvider::Mock => {
            tracing::info!("Using mock messaging provider");
            Some(Arc::new(MockDispatcher::new()))
        }
        MessagingProvider::Twilio => create_twilio(config),
    }
}

#[cfg(feature = "twilio-sms")]
fn create_twilio(config: &MessagingConfig) -> Option<Arc<dyn MessageDispatcher>> {
    if config.twilio.is_none() {
        tracing::warn!("Twilio credentials not set, SMS and WhatsApp delivery disabled");
        return None;
    }

    match TwilioConfig::from_messaging(config).and_then(TwilioDispatcher::new) {
        Ok(dispatcher) => Some(Arc::new(dispatcher)),
        Err(e) => {
            tracing::error!("Failed to initialize Twilio dispatcher: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "twilio-sms"))]
fn create_twilio(_config: &MessagingConfig) -> Option<Arc<dyn MessageDispatcher>> {
    tracing::warn!("Built without the twilio-sms feature, SMS and WhatsApp delivery disabled");
    None
}
