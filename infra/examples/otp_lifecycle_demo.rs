//! Walks through the OTP lifecycle: generate, resend, validate, replay
//!
//! Uses Redis when `REDIS_URL` is set, otherwise an in-memory store. Messages
//! go to the mock dispatcher unless Twilio is configured through the
//! environment.
//!
//! ```bash
//! cargo run -p otp_infra --example otp_lifecycle_demo
//! REDIS_URL=redis://127.0.0.1:6379 MESSAGING_PROVIDER=mock \
//!     cargo run -p otp_infra --example otp_lifecycle_demo
//! ```

use std::sync::Arc;

use otp_core::{Delivery, OtpManager, OtpManagerConfig, OtpStore};
use otp_infra::cache::MemoryOtpStore;
use otp_infra::{initialize_with_config, load_config, messaging, telemetry};
use otp_shared::MessagingProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = load_config()?;
    telemetry::init_tracing(&config.logging)?;

    if config.messaging.twilio.is_none() {
        config.messaging.provider = MessagingProvider::Mock;
    }

    println!("OTP Lifecycle Demo");
    println!("==================\n");

    let manager = if std::env::var("REDIS_URL").is_ok() {
        println!("Using Redis at {}\n", config.cache.url);
        initialize_with_config(config).await?.otp_manager
    } else {
        println!("REDIS_URL not set, using the in-memory store\n");
        let store: Arc<dyn OtpStore> = Arc::new(MemoryOtpStore::new());
        Arc::new(OtpManager::new(
            store,
            messaging::create_dispatcher(&config.messaging),
            OtpManagerConfig::from(&config.otp),
        ))
    };

    let phone = "+14155552671";

    // 1. Generate and deliver over SMS
    let issued = manager.generate(phone, "sms").await?;
    println!("1. Issued code {} to {} (expires {})", issued.code, phone, issued.expires_at);
    describe(&issued.delivery);

    // 2. Resend the same code over WhatsApp
    let delivery = manager.resend(phone, "whatsapp").await?;
    println!("2. Resent live code over WhatsApp");
    describe(&delivery);

    // 3. Wrong code
    let outcome = manager.validate(phone, "not-it").await?;
    println!("3. Wrong code       -> {:?}", outcome);

    // 4. Right code
    let outcome = manager.validate(phone, issued.code.as_str()).await?;
    println!("4. Correct code     -> {:?}", outcome);

    // 5. Replay
    let outcome = manager.validate(phone, issued.code.as_str()).await?;
    println!("5. Replayed code    -> {:?}", outcome);

    // 6. Email has no delivery integration
    let issued = manager.generate("alice@example.com", "email").await?;
    println!("6. Email channel");
    describe(&issued.delivery);

    // 7. Unsupported channel
    match manager.generate(phone, "fax").await {
        Ok(_) => println!("7. Unexpectedly accepted 'fax'"),
        Err(e) => println!("7. Rejected: {} (client error: {})", e, e.is_client_error()),
    }

    Ok(())
}

fn describe(delivery: &Delivery) {
    match delivery {
        Delivery::Sent { message_id } => println!("   sent, message id {}", message_id),
        Delivery::Skipped { channel, reason } => println!("   skipped for {}: {}", channel, reason),
        Delivery::Failed(err) => println!("   delivery failed: {}", err),
    }
}
