//! Redis-backed verification code store

use async_trait::async_trait;
use tracing::{debug, error};

use mc_core::errors::{DomainError, DomainResult};
use mc_core::repositories::CodeStore;
use mc_shared::utils::email::mask_email;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Key namespace for stored codes
pub const CODE_KEY_PREFIX: &str = "verification:code";

/// [`CodeStore`] holding one code per identifier under
/// `[prefix:]verification:code:{identifier}`
///
/// Writes use `SET key value EX ttl`, so a new code replaces the previous one
/// together with its expiry.
#[derive(Clone)]
pub struct RedisCodeStore {
    client: RedisClient,
}

impl RedisCodeStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Full Redis key for `identifier`
    pub fn code_key(&self, identifier: &str) -> String {
        self.client
            .config()
            .make_key(&format!("{}:{}", CODE_KEY_PREFIX, identifier))
    }

    /// Remove the stored code, e.g. after a successful verification
    pub async fn remove(&self, identifier: &str) -> DomainResult<bool> {
        self.client
            .delete(&self.code_key(identifier))
            .await
            .map_err(|e| store_unavailable("delete", identifier, e))
    }

    pub async fn health_check(&self) -> DomainResult<bool> {
        self.client
            .health_check()
            .await
            .map_err(|e| store_unavailable("ping", "", e))
    }
}

#[async_trait]
impl CodeStore for RedisCodeStore {
    async fn set(&self, identifier: &str, code: &str, ttl_seconds: u64) -> DomainResult<()> {
        if ttl_seconds == 0 {
            return Err(DomainError::Configuration {
                message: "code TTL must be positive".to_string(),
            });
        }

        self.client
            .set_with_expiry(&self.code_key(identifier), code, ttl_seconds)
            .await
            .map_err(|e| store_unavailable("set", identifier, e))?;

        debug!(
            identifier = %mask_email(identifier),
            ttl_seconds = ttl_seconds,
            "Stored verification code"
        );
        Ok(())
    }

    async fn get(&self, identifier: &str) -> DomainResult<Option<String>> {
        self.client
            .get(&self.code_key(identifier))
            .await
            .map_err(|e| store_unavailable("get", identifier, e))
    }

    async fn ttl(&self, identifier: &str) -> DomainResult<Option<u64>> {
        let ttl = self
            .client
            .ttl(&self.code_key(identifier))
            .await
            .map_err(|e| store_unavailable("ttl", identifier, e))?;
        Ok(ttl.map(|seconds| seconds as u64))
    }
}

fn store_unavailable(operation: &str, identifier: &str, err: InfrastructureError) -> DomainError {
    error!(
        operation = operation,
        identifier = %mask_email(identifier),
        error = %err,
        event = "code_store_unavailable",
        "Redis code store operation failed"
    );
    DomainError::StoreUnavailable {
        message: err.to_string(),
    }
}
