//! Errors reported by email providers
//!
//! Providers map their native failures onto [`ProviderErrorCode`] so the
//! dispatcher can classify them without knowing provider specifics.

use std::fmt;
use thiserror::Error;

/// Provider-neutral failure codes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Recipient address is malformed or does not exist
    InvalidAddress,
    /// Provider refused the message content or sender
    Rejected,
    /// Sending account is suspended or paused
    AccountSuspended,
    /// Rate limit hit
    Throttled,
    /// Provider did not answer in time
    Timeout,
    /// Connection-level failure
    Network,
    /// Provider reported an internal or availability error
    Unavailable,
    /// Anything else, carrying the provider's native code
    Other(String),
}

impl ProviderErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ProviderErrorCode::InvalidAddress => "invalid_address",
            ProviderErrorCode::Rejected => "rejected",
            ProviderErrorCode::AccountSuspended => "account_suspended",
            ProviderErrorCode::Throttled => "throttled",
            ProviderErrorCode::Timeout => "timeout",
            ProviderErrorCode::Network => "network",
            ProviderErrorCode::Unavailable => "unavailable",
            ProviderErrorCode::Other(code) => code,
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure returned by an email provider send call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{provider} send failed ({code}): {message}")]
pub struct ProviderError {
    /// Provider name, e.g. `ses`
    pub provider: String,
    pub code: ProviderErrorCode,
    pub message: String,
}

impl ProviderError {
    pub fn new(
        provider: impl Into<String>,
        code: ProviderErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            code,
            message: message.into(),
        }
    }
}
