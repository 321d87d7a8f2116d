//! Unit tests for the SES email provider

use mc_core::errors::{ProviderError, ProviderErrorCode};
use mc_core::services::dispatch::{DefaultErrorClassifier, ErrorClassifier, FailureKind};

use crate::email::ses::{code_for_service_error, from_address};

#[test]
fn test_error_code_mapping() {
    assert_eq!(code_for_service_error(Some("MessageRejected")), ProviderErrorCode::Rejected);
    assert_eq!(
        code_for_service_error(Some("AccountSuspendedException")),
        ProviderErrorCode::AccountSuspended
    );
    assert_eq!(
        code_for_service_error(Some("SendingPausedException")),
        ProviderErrorCode::AccountSuspended
    );
    assert_eq!(
        code_for_service_error(Some("TooManyRequestsException")),
        ProviderErrorCode::Throttled
    );
    assert_eq!(
        code_for_service_error(Some("BadRequestException")),
        ProviderErrorCode::InvalidAddress
    );
    assert_eq!(code_for_service_error(Some("InternalFailure")), ProviderErrorCode::Unavailable);
    assert_eq!(code_for_service_error(None), ProviderErrorCode::Unavailable);
    assert_eq!(
        code_for_service_error(Some("ConflictException")),
        ProviderErrorCode::Other("ConflictException".to_string())
    );
}

#[test]
fn test_error_classification() {
    let classifier = DefaultErrorClassifier::new();
    let kind = |code: &str| {
        classifier.classify(&ProviderError::new("ses", code_for_service_error(Some(code)), ""))
    };

    assert_eq!(kind("MessageRejected"), FailureKind::Permanent);
    assert_eq!(kind("MailFromDomainNotVerifiedException"), FailureKind::Permanent);
    assert_eq!(kind("AccountSuspendedException"), FailureKind::Permanent);
    assert_eq!(kind("LimitExceededException"), FailureKind::Transient);
    assert_eq!(kind("ServiceUnavailable"), FailureKind::Transient);
}

#[test]
fn test_from_address() {
    assert_eq!(from_address("no-reply@mailcode.dev", None), "no-reply@mailcode.dev");
    assert_eq!(
        from_address("no-reply@mailcode.dev", Some("MailCode")),
        "MailCode <no-reply@mailcode.dev>"
    );
    assert_eq!(from_address("no-reply@mailcode.dev", Some("  ")), "no-reply@mailcode.dev");
}
