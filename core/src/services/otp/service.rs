//! Main OTP lifecycle manager implementation

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use otp_shared::mask_identity;

use crate::domain::{Channel, OtpCode, OtpKey};
use crate::errors::{DispatchError, OtpError, OtpResult};

use super::config::OtpManagerConfig;
use super::traits::{MessageDispatcher, OtpStore};
use super::types::{Delivery, InvalidReason, IssuedOtp, ValidationOutcome};

/// Issues, stores and validates one-time passcodes
///
/// The manager keeps no state between calls. Every live code sits in the
/// store under `{prefix}:{identity}` and disappears when its TTL elapses,
/// when a newer code overwrites it, or when it is consumed by a successful
/// validation.
pub struct OtpManager {
    /// Store holding live codes
    store: Arc<dyn OtpStore>,
    /// Provider for SMS / WhatsApp delivery, `None` when unconfigured
    dispatcher: Option<Arc<dyn MessageDispatcher>>,
    /// Manager configuration
    config: OtpManagerConfig,
}

impl OtpManager {
    /// Create a new OTP manager
    ///
    /// # Arguments
    ///
    /// * `store` - Store implementation with per-key TTL
    /// * `dispatcher` - Messaging provider, `None` disables SMS / WhatsApp delivery
    /// * `config` - Manager configuration
    pub fn new(
        store: Arc<dyn OtpStore>,
        dispatcher: Option<Arc<dyn MessageDispatcher>>,
        config: OtpManagerConfig,
    ) -> Self {
        if dispatcher.is_none() {
            warn!("No messaging provider configured, SMS and WhatsApp delivery disabled");
        }

        Self {
            store,
            dispatcher,
            config,
        }
    }

    /// Manager configuration
    pub fn config(&self) -> &OtpManagerConfig {
        &self.config
    }

    /// Whether SMS / WhatsApp delivery is available
    pub fn has_dispatcher(&self) -> bool {
        self.dispatcher.is_some()
    }

    /// Issue a new code for an identity and deliver it over a channel
    ///
    /// This method:
    /// 1. Validates the identity and parses the channel
    /// 2. Generates and stores a new code, replacing any previous one
    /// 3. Delivers the code over the channel
    ///
    /// A delivery failure does not undo generation; it is reported in
    /// `IssuedOtp::delivery`.
    ///
    /// # Arguments
    ///
    /// * `identity` - User identity (username or phone number)
    /// * `channel` - One of `sms`, `whatsapp`, `email`
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedOtp)` - The stored code and its delivery outcome
    /// * `Err(OtpError)` - Invalid input, unsupported channel, or store failure
    pub async fn generate(&self, identity: &str, channel: &str) -> OtpResult<IssuedOtp> {
        let identity = require_identity(identity)?;
        let channel: Channel = channel.parse()?;

        let code = self.generate_code(identity).await?;
        let expires_at = self.expiry_from_now();

        let delivery = match self.send(identity, &code, channel).await {
            Ok(delivery) => delivery,
            Err(OtpError::Dispatch(err)) => {
                warn!(
                    identity = %mask_identity(identity),
                    channel = %channel,
                    status = ?err.status,
                    error = %err,
                    event = "otp_delivery_failed",
                    "Code stored but delivery failed"
                );
                Delivery::Failed(err)
            }
            Err(other) => return Err(other),
        };

        Ok(IssuedOtp {
            identity: identity.to_string(),
            code,
            channel,
            expires_at,
            delivery,
        })
    }

    /// Deliver the live code of an identity again
    ///
    /// # Returns
    ///
    /// * `Ok(Delivery)` - Delivery outcome for the unchanged code
    /// * `Err(OtpError::NotFound)` - No live code for the identity
    /// * `Err(OtpError::Dispatch)` - The provider rejected the message
    pub async fn resend(&self, identity: &str, channel: &str) -> OtpResult<Delivery> {
        let identity = require_identity(identity)?;
        let channel: Channel = channel.parse()?;

        let code = self.get_current(identity).await?;

        info!(
            identity = %mask_identity(identity),
            channel = %channel,
            event = "otp_resend",
            "Resending live verification code"
        );

        self.send(identity, &code, channel).await
    }

    /// Generate a code and store it under the identity's key
    ///
    /// The code is only returned once the store has accepted it; on a
    /// failed write it is dropped.
    pub async fn generate_code(&self, identity: &str) -> OtpResult<OtpCode> {
        let identity = require_identity(identity)?;
        let key = self.key_for(identity);
        let code = OtpCode::generate();

        self.store
            .set(key.as_str(), code.as_str(), self.config.ttl)
            .await
            .map_err(|e| {
                error!(
                    identity = %mask_identity(identity),
                    error = %e,
                    event = "otp_storage_failed",
                    "Failed to store verification code"
                );
                OtpError::from(e)
            })?;

        info!(
            identity = %mask_identity(identity),
            ttl_seconds = self.config.ttl.as_secs(),
            event = "otp_generated",
            "Generated new verification code"
        );

        Ok(code)
    }

    /// Read the live code of an identity
    ///
    /// # Returns
    ///
    /// * `Ok(OtpCode)` - The code currently stored
    /// * `Err(OtpError::NotFound)` - Absent or expired
    /// * `Err(OtpError::StoreUnavailable)` - The store could not be read
    pub async fn get_current(&self, identity: &str) -> OtpResult<OtpCode> {
        let identity = require_identity(identity)?;
        let key = self.key_for(identity);

        let stored = self.store.get(key.as_str()).await.map_err(|e| {
            error!(
                identity = %mask_identity(identity),
                error = %e,
                event = "otp_read_failed",
                "Failed to read verification code"
            );
            OtpError::from(e)
        })?;

        let not_found = || OtpError::NotFound {
            identity: identity.to_string(),
        };

        match stored {
            Some(raw) => OtpCode::parse(&raw).ok_or_else(|| {
                warn!(
                    identity = %mask_identity(identity),
                    event = "otp_malformed",
                    "Stored value is not a valid verification code"
                );
                not_found()
            }),
            None => Err(not_found()),
        }
    }

    /// Validate a submitted code
    ///
    /// With `consume_on_success` enabled the matching entry is removed
    /// through the store's atomic compare-and-delete, so among concurrent
    /// validators of one code at most one sees `Valid`.
    ///
    /// # Returns
    ///
    /// * `Ok(ValidationOutcome)` - Valid, or the reason the code was rejected
    /// * `Err(OtpError::InvalidInput)` - Empty identity
    pub async fn validate(&self, identity: &str, submitted: &str) -> OtpResult<ValidationOutcome> {
        let identity = require_identity(identity)?;
        let key = self.key_for(identity);
        let masked = mask_identity(identity);

        let stored = match self.store.get(key.as_str()).await {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                info!(
                    identity = %masked,
                    event = "otp_expired",
                    "No live verification code (expired or never issued)"
                );
                return Ok(ValidationOutcome::Invalid(InvalidReason::Expired));
            }
            Err(e) => {
                error!(
                    identity = %masked,
                    error = %e,
                    event = "otp_verification_error",
                    "Store error during code verification"
                );
                return Ok(ValidationOutcome::Invalid(InvalidReason::ServerError));
            }
        };

        if !codes_match(&stored, submitted) {
            warn!(
                identity = %masked,
                event = "otp_verification_failed",
                "Verification code mismatch"
            );
            return Ok(ValidationOutcome::Invalid(InvalidReason::Mismatch));
        }

        if !self.config.consume_on_success {
            info!(
                identity = %masked,
                event = "otp_verified_success",
                "Verification code verified (not consumed)"
            );
            return Ok(ValidationOutcome::Valid);
        }

        match self.store.delete_if_equals(key.as_str(), &stored).await {
            Ok(true) => {
                info!(
                    identity = %masked,
                    event = "otp_verified_success",
                    "Verification code verified and consumed"
                );
                Ok(ValidationOutcome::Valid)
            }
            Ok(false) => {
                // Consumed, replaced or evicted between the read and the delete
                warn!(
                    identity = %masked,
                    event = "otp_consume_lost",
                    "Verification code no longer live at consumption"
                );
                Ok(ValidationOutcome::Invalid(InvalidReason::Expired))
            }
            Err(e) => {
                error!(
                    identity = %masked,
                    error = %e,
                    event = "otp_consume_failed",
                    "Failed to consume verification code"
                );
                Ok(ValidationOutcome::Invalid(InvalidReason::ServerError))
            }
        }
    }

    /// Deliver a code over a channel
    ///
    /// Email has no delivery integration and yields `Delivery::Skipped`
    /// without sending anything.
    pub async fn send(
        &self,
        identity: &str,
        code: &OtpCode,
        channel: Channel,
    ) -> OtpResult<Delivery> {
        let masked = mask_identity(identity);

        let dispatcher = match channel {
            Channel::Email => {
                warn!(
                    identity = %masked,
                    event = "otp_delivery_skipped",
                    "Email delivery is not implemented, nothing sent"
                );
                return Ok(Delivery::Skipped {
                    channel,
                    reason: "email delivery not implemented".to_string(),
                });
            }
            Channel::Sms | Channel::WhatsApp => self
                .dispatcher
                .as_ref()
                .ok_or_else(DispatchError::not_configured)?,
        };

        let body = self.config.message_for(code);
        debug!(
            identity = %masked,
            channel = %channel,
            provider = dispatcher.provider_name(),
            "Dispatching verification code"
        );

        let sent = match channel {
            Channel::WhatsApp => dispatcher.send_whatsapp(identity, &body).await,
            _ => dispatcher.send_sms(identity, &body).await,
        };

        let message_id = sent?;
        info!(
            identity = %masked,
            channel = %channel,
            message_id = %message_id,
            event = "otp_delivered",
            "Verification code handed to provider"
        );

        Ok(Delivery::Sent { message_id })
    }

    fn key_for(&self, identity: &str) -> OtpKey {
        OtpKey::for_identity(&self.config.key_prefix, identity)
    }

    fn expiry_from_now(&self) -> DateTime<Utc> {
        let now = Utc::now();
        chrono::Duration::from_std(self.config.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Reject empty or whitespace-only identities before touching the store
fn require_identity(identity: &str) -> OtpResult<&str> {
    if identity.trim().is_empty() {
        return Err(OtpError::InvalidInput {
            message: "identity must not be empty".to_string(),
        });
    }
    Ok(identity)
}

/// Exact string equality without early exit on the first differing byte
pub(crate) fn codes_match(stored: &str, submitted: &str) -> bool {
    if stored.len() != submitted.len() {
        return false;
    }
    constant_time_eq(stored.as_bytes(), submitted.as_bytes())
}
