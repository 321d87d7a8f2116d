//! Unit tests for domain error types

use crate::errors::{DomainError, ProviderError, ProviderErrorCode};

#[test]
fn test_domain_error_messages() {
    let error = DomainError::InvalidIdentifier {
        reason: "identifier must not be empty".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Invalid identifier: identifier must not be empty"
    );
    assert_eq!(error.code(), "INVALID_IDENTIFIER");
}

#[test]
fn test_retriable_errors() {
    let store = DomainError::StoreUnavailable {
        message: "connection refused".to_string(),
    };
    let enqueue = DomainError::DeliveryEnqueueFailed {
        message: "timeout".to_string(),
    };
    let invalid = DomainError::InvalidIdentifier {
        reason: "bad".to_string(),
    };

    assert!(store.is_retriable());
    assert!(enqueue.is_retriable());
    assert!(!invalid.is_retriable());
}

#[test]
fn test_json_error_becomes_invalid_message() {
    let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let domain: DomainError = err.into();
    assert!(matches!(domain, DomainError::InvalidMessage { .. }));
}

#[test]
fn test_provider_error_display() {
    let error = ProviderError::new("ses", ProviderErrorCode::Throttled, "Maximum sending rate exceeded");
    assert_eq!(
        error.to_string(),
        "ses send failed (throttled): Maximum sending rate exceeded"
    );

    let other = ProviderError::new("http", ProviderErrorCode::Other("E_QUOTA".to_string()), "quota");
    assert_eq!(other.code.as_str(), "E_QUOTA");
}
