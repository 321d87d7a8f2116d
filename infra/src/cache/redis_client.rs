//! Redis cache client implementation
//!
//! Provides a multiplexed Redis connection with bounded retry, a response
//! timeout on every command and the handful of operations the code store
//! needs.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use mc_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Upper bound for the exponential backoff between attempts
const MAX_RETRY_DELAY_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis client with connection retry and per-command timeout
///
/// Cloning is cheap; clones share the multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl RedisClient {
    /// Connect using the retry and timeout settings of `config`
    ///
    /// # Example
    /// ```no_run
    /// use mc_infra::cache::{CacheConfig, RedisClient};
    ///
    /// async fn connect() -> Result<RedisClient, mc_infra::InfrastructureError> {
    ///     RedisClient::new(CacheConfig::new("redis://localhost:6379")).await
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(
            url = %mask_url(&config.url),
            max_retries = config.max_retries,
            event = "redis_connecting",
            "Creating Redis client"
        );

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(&client, &config).await?;

        info!(event = "redis_connected", "Redis client created successfully");

        Ok(Self { connection, config })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: &Client,
        config: &CacheConfig,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let max_retries = config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = config.retry_delay_ms.min(MAX_RETRY_DELAY_MS);

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let connect = client.get_multiplexed_async_connection();
            let result = match timeout(config.connection_timeout(), connect).await {
                Ok(result) => result,
                Err(_) => Err(timed_out("connect", config.connection_timeout())),
            };

            match result {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = delay.saturating_mul(2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!(
                        "Failed to connect to Redis after {} attempts: {}",
                        attempts, e
                    );
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Set a value with expiration time (`SET key value EX seconds`)
    ///
    /// Replaces any previous value and its TTL atomically.
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        self.execute_with_retry("set_ex", |mut conn| {
            let key = key.to_string();
            let value = value.to_string();
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// Get a value, `None` if the key is absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        self.execute_with_retry("get", |mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// Delete a key; true if it existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        self.execute_with_retry("del", |mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.del::<_, u32>(key).await })
        })
        .await
        .map(|deleted| deleted > 0)
        .map_err(InfrastructureError::Cache)
    }

    /// Remaining time-to-live in seconds
    ///
    /// `None` if the key does not exist or has no expiry.
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let ttl = self
            .execute_with_retry("ttl", |mut conn| {
                let key = key.to_string();
                Box::pin(async move { conn.ttl::<_, i64>(key).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        // -1: no expiry, -2: missing key
        Ok((ttl >= 0).then_some(ttl))
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let result = self
            .execute_with_retry("ping", |mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await;

        match result {
            Ok(response) if response == "PONG" => Ok(true),
            Ok(response) => {
                warn!("Redis health check returned unexpected response: {}", response);
                Ok(false)
            }
            Err(e) => {
                error!(error = %e, event = "redis_health_check_failed", "Redis health check failed");
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    /// Execute a Redis operation with timeout and bounded retry
    ///
    /// A command exceeding the response timeout fails with an I/O error and
    /// is retried like any other retriable error.
    async fn execute_with_retry<F, T>(&self, command: &'static str, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let max_retries = self.config.max_retries.max(1);
        let response_timeout = self.config.response_timeout();
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms.min(MAX_RETRY_DELAY_MS);

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            let result = match timeout(response_timeout, operation(conn)).await {
                Ok(result) => result,
                Err(_) => Err(timed_out(command, response_timeout)),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if attempts < max_retries && is_retriable_error(&e) => {
                    warn!(
                        command = command,
                        attempt = attempts,
                        max_retries = max_retries,
                        error = %e,
                        "Redis command failed, retrying in {}ms",
                        delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = delay.saturating_mul(2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!(
                        command = command,
                        attempts = attempts,
                        error = %e,
                        event = "redis_command_failed",
                        "Redis command failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}

fn timed_out(command: &str, after: Duration) -> RedisError {
    RedisError::from(std::io::Error::new(
        std::io::ErrorKind::TimedOut,
        format!("redis {} timed out after {}ms", command, after.as_millis()),
    ))
}

/// Check if a Redis error is transient and the command may be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials of a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}
