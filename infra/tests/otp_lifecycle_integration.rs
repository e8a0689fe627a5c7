//! End-to-end OTP lifecycle tests over the in-memory store and mock dispatcher

use std::sync::Arc;
use std::time::Duration;

use otp_core::{
    Channel, Delivery, InvalidReason, MessageDispatcher, OtpError, OtpManager, OtpManagerConfig,
    OtpStore, ValidationOutcome,
};
use otp_infra::cache::MemoryOtpStore;
use otp_infra::messaging::MockDispatcher;
use otp_shared::AppConfig;

fn build(ttl: Duration) -> (Arc<MemoryOtpStore>, MockDispatcher, OtpManager) {
    let store = Arc::new(MemoryOtpStore::new());
    let dispatcher = MockDispatcher::new();
    let config = OtpManagerConfig {
        ttl,
        ..OtpManagerConfig::default()
    };
    let manager = OtpManager::new(
        store.clone() as Arc<dyn OtpStore>,
        Some(Arc::new(dispatcher.clone()) as Arc<dyn MessageDispatcher>),
        config,
    );
    (store, dispatcher, manager)
}

#[tokio::test]
async fn test_generate_and_validate_over_email() -> anyhow::Result<()> {
    let (_store, dispatcher, manager) = build(Duration::from_secs(2));

    let issued = manager.generate("alice", "email").await?;
    assert!(matches!(issued.delivery, Delivery::Skipped { .. }));
    assert_eq!(dispatcher.message_count(), 0);

    let outcome = manager.validate("alice", issued.code.as_str()).await?;
    assert_eq!(outcome, ValidationOutcome::Valid);
    Ok(())
}

#[tokio::test]
async fn test_validate_unknown_identity() -> anyhow::Result<()> {
    let (_store, _dispatcher, manager) = build(Duration::from_secs(2));

    let outcome = manager.validate("bob", "000000").await?;

    assert_eq!(outcome, ValidationOutcome::Invalid(InvalidReason::Expired));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_code_expires() -> anyhow::Result<()> {
    let (store, _dispatcher, manager) = build(Duration::from_secs(2));

    let issued = manager.generate("carol", "email").await?;
    tokio::time::advance(Duration::from_secs(3)).await;

    let outcome = manager.validate("carol", issued.code.as_str()).await?;
    assert_eq!(outcome, ValidationOutcome::Invalid(InvalidReason::Expired));
    assert!(store.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn test_sms_generate_resend_validate() -> anyhow::Result<()> {
    let (_store, dispatcher, manager) = build(Duration::from_secs(300));
    let phone = "+14155552671";

    let issued = manager.generate(phone, "sms").await?;
    assert_eq!(issued.channel, Channel::Sms);
    assert!(issued.delivery.is_sent());

    let first = dispatcher.last_message_to(phone).await.expect("first message");
    assert_eq!(
        first.body,
        format!(
            "Your verification code is: {}. It will expire in 5 minutes.",
            issued.code
        )
    );

    let resent = manager.resend(phone, "whatsapp").await?;
    assert!(resent.is_sent());
    let second = dispatcher.last_message_to(phone).await.expect("second message");
    assert_eq!(second.channel, "whatsapp");
    assert_eq!(second.body, first.body);

    assert!(manager.validate(phone, issued.code.as_str()).await?.is_valid());
    assert!(matches!(
        manager.resend(phone, "sms").await,
        Err(OtpError::NotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_provider_outage_keeps_code_valid() -> anyhow::Result<()> {
    let (_store, dispatcher, manager) = build(Duration::from_secs(60));
    dispatcher.set_simulate_failure(true);

    let issued = manager.generate("+14155552671", "sms").await?;

    match &issued.delivery {
        Delivery::Failed(err) => assert_eq!(err.status, Some(503)),
        other => panic!("expected failed delivery, got {:?}", other),
    }
    assert!(manager
        .validate("+14155552671", issued.code.as_str())
        .await?
        .is_valid());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_validation_is_single_use() -> anyhow::Result<()> {
    let (_store, _dispatcher, manager) = build(Duration::from_secs(60));
    let manager = Arc::new(manager);
    let issued = manager.generate("dave", "email").await?;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let manager = manager.clone();
        let code = issued.code.clone();
        handles.push(tokio::spawn(async move {
            manager.validate("dave", code.as_str()).await
        }));
    }

    let mut valid = 0;
    for handle in handles {
        if handle.await??.is_valid() {
            valid += 1;
        }
    }
    assert_eq!(valid, 1);
    Ok(())
}

#[test]
fn test_manager_config_from_environment() -> anyhow::Result<()> {
    let config = AppConfig::from_lookup(|key| match key {
        "OTP_TTL_SECONDS" => Some("90".to_string()),
        "OTP_KEY_PREFIX" => Some("login".to_string()),
        "OTP_CONSUME_ON_SUCCESS" => Some("false".to_string()),
        _ => None,
    })?;

    let manager_config = OtpManagerConfig::from(&config.otp);
    assert_eq!(manager_config.ttl, Duration::from_secs(90));
    assert_eq!(manager_config.key_prefix, "login");
    assert!(!manager_config.consume_on_success);
    assert_eq!(manager_config.ttl_minutes(), 2);
    Ok(())
}

#[test]
fn test_out_of_range_ttl_fails_config_loading() {
    let result = AppConfig::from_lookup(|key| match key {
        "OTP_TTL_SECONDS" => Some(u64::MAX.to_string()),
        _ => None,
    });

    assert!(result.is_err());
}
