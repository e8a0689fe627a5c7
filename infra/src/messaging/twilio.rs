//! Twilio dispatcher for SMS and WhatsApp
//!
//! Recipients are validated and normalized to E.164 before sending.
//! WhatsApp messages go through the same Messages API with both numbers
//! prefixed `whatsapp:`.

use async_trait::async_trait;
use phonenumber::{Mode, PhoneNumber};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use twilio::{Client, OutboundMessage};

use otp_core::{DispatchError, MessageDispatcher};
use otp_shared::{mask_identity, MessagingConfig, TwilioCredentials};

use crate::InfrastructureError;

/// Twilio's limit for a message body
const MAX_BODY_CHARS: usize = 1600;

const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Twilio dispatcher configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub credentials: TwilioCredentials,
    /// Maximum send attempts per message
    pub max_retries: u32,
    /// Initial retry delay in milliseconds, doubled after each attempt
    pub retry_delay_ms: u64,
}

impl TwilioConfig {
    /// Build from messaging configuration, failing when credentials are missing
    pub fn from_messaging(config: &MessagingConfig) -> Result<Self, InfrastructureError> {
        let credentials = config.twilio.clone().ok_or_else(|| {
            InfrastructureError::Config(
                "TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN and TWILIO_FROM_NUMBER must all be set"
                    .to_string(),
            )
        })?;

        Ok(Self {
            credentials,
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }
}

/// Message channel on the Twilio side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Sms,
    WhatsApp,
}

impl Route {
    fn address(self, number: &str) -> String {
        match self {
            Route::Sms => number.to_string(),
            Route::WhatsApp => format!("{}{}", WHATSAPP_PREFIX, number),
        }
    }
}

/// What to do after a failed send
#[derive(Debug, PartialEq, Eq)]
enum RetryDecision {
    Retry,
    GiveUp,
}

/// Twilio implementation of `MessageDispatcher`
pub struct TwilioDispatcher {
    client: Client,
    config: TwilioConfig,
}

impl TwilioDispatcher {
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        let from = &config.credentials.from_number;
        if !from.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_FROM_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        let client = Client::new(
            &config.credentials.account_sid,
            &config.credentials.auth_token,
        );

        info!(
            from = %mask_identity(from),
            "Twilio dispatcher initialized"
        );

        Ok(Self { client, config })
    }

    async fn dispatch(&self, route: Route, to: &str, body: &str) -> Result<String, DispatchError> {
        let to = normalize_phone_number(to)?;

        if body.chars().count() > MAX_BODY_CHARS {
            return Err(DispatchError::new(format!(
                "Message exceeds maximum length of {} characters",
                MAX_BODY_CHARS
            )));
        }

        let from = route.address(&self.config.credentials.from_number);
        let to_address = route.address(&to);

        info!(
            to = %mask_identity(&to),
            route = ?route,
            body_chars = body.chars().count(),
            "Sending message via Twilio"
        );

        self.send_with_retry(&from, &to_address, body).await
    }

    async fn send_with_retry(&self, from: &str, to: &str, body: &str) -> Result<String, DispatchError> {
        let max_retries = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;
            debug!(attempt = attempts, max_retries, "Twilio send attempt");

            let msg = OutboundMessage::new(from, to, body);
            let err = match self.client.send_message(msg).await {
                Ok(response) => {
                    info!(sid = %response.sid, "Message accepted by Twilio");
                    return Ok(response.sid);
                }
                Err(e) => e.to_string(),
            };

            let status = status_from_error(&err);
            error!(
                attempt = attempts,
                max_retries,
                status = ?status,
                error = %err,
                "Twilio send failed"
            );

            let failure = |message: String| {
                let error = DispatchError::new(message);
                match status {
                    Some(code) => error.with_status(code),
                    None => error,
                }
            };

            if retry_decision(status) == RetryDecision::GiveUp {
                return Err(failure(format!("Request rejected: {}", err)));
            }
            if attempts >= max_retries {
                return Err(failure(format!(
                    "Failed to send message after {} attempts: {}",
                    attempts, err
                )));
            }

            warn!("Retrying Twilio send after {:?}", delay);
            tokio::time::sleep(delay).await;
            delay = delay.saturating_mul(2);
        }
    }
}

#[async_trait]
impl MessageDispatcher for TwilioDispatcher {
    async fn send_sms(&self, to: &str, body: &str) -> Result<String, DispatchError> {
        self.dispatch(Route::Sms, to, body).await
    }

    async fn send_whatsapp(&self, to: &str, body: &str) -> Result<String, DispatchError> {
        self.dispatch(Route::WhatsApp, to, body).await
    }

    fn provider_name(&self) -> &str {
        "Twilio"
    }
}

/// Validate a recipient and format it as E.164
///
/// The number must carry its country code; no default region is assumed.
pub fn normalize_phone_number(phone: &str) -> Result<String, DispatchError> {
    let phone = phone.trim();
    let phone = phone.strip_prefix(WHATSAPP_PREFIX).unwrap_or(phone);

    if !phone.starts_with('+') {
        return Err(DispatchError::new(
            "Phone number must be in E.164 format (e.g., +14155552671)",
        )
        .with_status(400));
    }

    let parsed = phone.parse::<PhoneNumber>().map_err(|e| {
        DispatchError::new(format!("Invalid phone number format: {}", e)).with_status(400)
    })?;

    if !phonenumber::is_valid(&parsed) {
        return Err(DispatchError::new("Invalid phone number").with_status(400));
    }

    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Extract an HTTP status from a provider error message
fn status_from_error(message: &str) -> Option<u16> {
    message
        .split(|c: char| !c.is_ascii_digit())
        .filter(|token| token.len() == 3)
        .filter_map(|token| token.parse::<u16>().ok())
        .find(|code| (400..600).contains(code))
}

/// Retry rate limiting and server errors, never other client errors
fn retry_decision(status: Option<u16>) -> RetryDecision {
    match status {
        Some(429) => RetryDecision::Retry,
        Some(code) if (400..500).contains(&code) => RetryDecision::GiveUp,
        _ => RetryDecision::Retry,
    }
}
