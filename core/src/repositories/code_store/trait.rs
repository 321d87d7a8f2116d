//! Code store trait defining the interface for identifier to code storage.
//!
//! The store holds at most one code per identifier. Writes replace any
//! previous value and reset its lifetime; expiry is enforced by the store.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Key-value store holding the current code of each identifier
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Atomically store `code` for `identifier`, replacing any prior value
    ///
    /// # Returns
    /// * `Ok(())` - Code stored with the given lifetime
    /// * `Err(DomainError::StoreUnavailable)` - Store could not be reached
    async fn set(&self, identifier: &str, code: &str, ttl_seconds: u64) -> Result<(), DomainError>;

    /// Current code for `identifier`, `None` when absent or expired
    async fn get(&self, identifier: &str) -> Result<Option<String>, DomainError>;

    /// Remaining lifetime in seconds, `None` when absent or expired
    async fn ttl(&self, identifier: &str) -> Result<Option<u64>, DomainError>;
}
