//! Configuration for the code generator service

use mc_shared::config::{CodeCharset, VerificationConfig};

use crate::domain::entities::verification_code::{DEFAULT_CODE_LENGTH, DEFAULT_TTL_SECONDS};

/// Configuration for the code generator service
#[derive(Debug, Clone)]
pub struct CodeGeneratorConfig {
    /// Number of characters in a code
    pub code_length: usize,
    /// Alphabet codes are drawn from
    pub charset: CodeCharset,
    /// Seconds a stored code stays valid
    pub ttl_seconds: u64,
}

impl Default for CodeGeneratorConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            charset: CodeCharset::default(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

impl From<&VerificationConfig> for CodeGeneratorConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            code_length: config.code_length,
            charset: config.charset,
            ttl_seconds: config.ttl_seconds,
        }
    }
}
