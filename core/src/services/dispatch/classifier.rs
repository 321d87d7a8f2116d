//! Provider failure classification

use std::collections::HashSet;

use crate::errors::{ProviderError, ProviderErrorCode};

/// Whether a failed send may succeed if retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transient,
    Permanent,
}

/// Maps provider errors onto retry decisions
pub trait ErrorClassifier: Send + Sync {
    fn classify(&self, error: &ProviderError) -> FailureKind;
}

/// Classifier over [`ProviderErrorCode`]
///
/// Address, rejection and suspension errors are permanent; throttling,
/// timeouts, network and availability errors are transient. Provider
/// specific `Other` codes are transient unless registered as permanent.
#[derive(Debug, Clone, Default)]
pub struct DefaultErrorClassifier {
    permanent_codes: HashSet<String>,
}

impl DefaultErrorClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat the provider-native `code` as permanent
    pub fn with_permanent_code(mut self, code: impl Into<String>) -> Self {
        self.permanent_codes.insert(code.into());
        self
    }
}

impl ErrorClassifier for DefaultErrorClassifier {
    fn classify(&self, error: &ProviderError) -> FailureKind {
        match &error.code {
            ProviderErrorCode::InvalidAddress
            | ProviderErrorCode::Rejected
            | ProviderErrorCode::AccountSuspended => FailureKind::Permanent,
            ProviderErrorCode::Throttled
            | ProviderErrorCode::Timeout
            | ProviderErrorCode::Network
            | ProviderErrorCode::Unavailable => FailureKind::Transient,
            ProviderErrorCode::Other(code) if self.permanent_codes.contains(code) => {
                FailureKind::Permanent
            }
            ProviderErrorCode::Other(_) => FailureKind::Transient,
        }
    }
}
