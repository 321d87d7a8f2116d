//! Verification code configuration module

use serde::{Deserialize, Serialize};

/// Smallest code length accepted by configuration validation
pub const MIN_CODE_LENGTH: usize = 6;

/// Character set codes are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CodeCharset {
    /// Uppercase letters and digits (36 symbols)
    #[default]
    Alphanumeric,
    /// Digits only (10 symbols)
    Numeric,
}

impl CodeCharset {
    /// Symbols of this charset
    pub fn alphabet(&self) -> &'static [u8] {
        match self {
            CodeCharset::Alphanumeric => b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
            CodeCharset::Numeric => b"0123456789",
        }
    }
}

/// Code generation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Number of characters in a code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Alphabet codes are drawn from
    #[serde(default)]
    pub charset: CodeCharset,

    /// Lifetime of a stored code in seconds
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            charset: CodeCharset::default(),
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

fn default_code_length() -> usize {
    6
}

fn default_ttl_seconds() -> u64 {
    300 // 5 minutes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VerificationConfig::default();
        assert_eq!(config.code_length, 6);
        assert_eq!(config.charset, CodeCharset::Alphanumeric);
        assert_eq!(config.ttl_seconds, 300);
    }

    #[test]
    fn test_alphabets() {
        assert_eq!(CodeCharset::Alphanumeric.alphabet().len(), 36);
        assert_eq!(CodeCharset::Numeric.alphabet(), b"0123456789");
    }
}
