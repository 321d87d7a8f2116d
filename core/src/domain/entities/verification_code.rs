//! Verification code entity for email-based verification.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};

use mc_shared::config::CodeCharset;

/// Default length of a verification code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default lifetime of a stored code (5 minutes)
pub const DEFAULT_TTL_SECONDS: u64 = 300;

const MAX_TTL_SECONDS: u64 = 10 * 365 * 24 * 3600;

/// The current code issued for an identifier
///
/// Only one code per identifier is live at a time; issuing a new one
/// overwrites the previous value in the code store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationCode {
    /// Email address the code was issued for
    pub identifier: String,

    /// The code value
    pub value: String,

    /// Timestamp when the code was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp after which the store no longer holds the code
    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Creates a code issued now and expiring after `ttl_seconds`
    pub fn new(identifier: impl Into<String>, value: impl Into<String>, ttl_seconds: u64) -> Self {
        let issued_at = Utc::now();
        // Clamped to keep timestamp arithmetic in range
        let ttl = ttl_seconds.min(MAX_TTL_SECONDS) as i64;
        Self {
            identifier: identifier.into(),
            value: value.into(),
            issued_at,
            expires_at: issued_at + Duration::seconds(ttl),
        }
    }

    /// Generates a code value from the operating system CSPRNG
    ///
    /// Each character is drawn uniformly from the charset alphabet.
    pub fn generate_value(length: usize, charset: CodeCharset) -> String {
        let alphabet = charset.alphabet();
        let mut rng = OsRng;
        (0..length)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
            .collect()
    }

    /// Checks if the code has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
