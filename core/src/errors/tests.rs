//! Unit tests for domain errors

use super::*;

#[test]
fn test_store_error_converts_to_store_unavailable() {
    let err: OtpError = StoreError::new("connection refused").into();
    match &err {
        OtpError::StoreUnavailable { message } => assert_eq!(message, "connection refused"),
        other => panic!("Expected StoreUnavailable, got {:?}", other),
    }
    assert!(!err.is_client_error());
}

#[test]
fn test_dispatch_error_keeps_provider_status() {
    let err: OtpError = DispatchError::new("Twilio returned 503").with_status(503).into();
    match err {
        OtpError::Dispatch(dispatch) => {
            assert_eq!(dispatch.status, Some(503));
            assert!(dispatch.to_string().contains("Twilio returned 503"));
        }
        other => panic!("Expected Dispatch, got {:?}", other),
    }
}

#[test]
fn test_client_errors() {
    assert!(OtpError::InvalidInput { message: "empty identity".into() }.is_client_error());
    assert!(OtpError::UnsupportedChannel { channel: "fax".into() }.is_client_error());
    assert!(OtpError::NotFound { identity: "alice".into() }.is_client_error());
    assert!(!OtpError::Dispatch(DispatchError::not_configured()).is_client_error());
}

#[test]
fn test_not_found_message_omits_identity() {
    let err = OtpError::NotFound { identity: "+14155552671".into() };
    assert!(!err.to_string().contains("4155552671"));
}
