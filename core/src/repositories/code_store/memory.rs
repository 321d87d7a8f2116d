//! In-memory code store for development and tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::errors::DomainError;

use super::trait_::CodeStore;

/// [`CodeStore`] backed by a `HashMap`
///
/// Expiry is checked on read against tokio's clock, so tests can drive it
/// with a paused runtime. Not durable.
#[derive(Clone, Default)]
pub struct MemoryCodeStore {
    codes: Arc<RwLock<HashMap<String, (String, Instant)>>>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until overwritten
    pub async fn len(&self) -> usize {
        self.codes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.codes.read().await.is_empty()
    }
}

#[async_trait]
impl CodeStore for MemoryCodeStore {
    async fn set(&self, identifier: &str, code: &str, ttl_seconds: u64) -> Result<(), DomainError> {
        if ttl_seconds == 0 {
            return Err(DomainError::Configuration {
                message: "code ttl must be positive".to_string(),
            });
        }

        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        self.codes
            .write()
            .await
            .insert(identifier.to_string(), (code.to_string(), expires_at));
        Ok(())
    }

    async fn get(&self, identifier: &str) -> Result<Option<String>, DomainError> {
        let codes = self.codes.read().await;
        Ok(codes
            .get(identifier)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(code, _)| code.clone()))
    }

    async fn ttl(&self, identifier: &str) -> Result<Option<u64>, DomainError> {
        let codes = self.codes.read().await;
        let now = Instant::now();
        Ok(codes
            .get(identifier)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(_, expires_at)| whole_seconds(*expires_at - now)))
    }
}

/// Remaining lifetime rounded up to whole seconds, as Redis `TTL` reports it
pub(crate) fn whole_seconds(remaining: Duration) -> u64 {
    remaining.as_millis().div_ceil(1000) as u64
}
