//! Inbound request for a new verification code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A caller's request for a code; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Email address to issue the code for
    #[serde(alias = "email")]
    pub identifier: String,

    /// When the request was made
    #[serde(default = "Utc::now")]
    pub requested_at: DateTime<Utc>,
}

impl VerificationRequest {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            requested_at: Utc::now(),
        }
    }
}
