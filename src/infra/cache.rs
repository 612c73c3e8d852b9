//! Redis cache implementation.
//!
//! Backs the fixed-window request counters used by the rate limiting
//! middleware.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use crate::config::{Config, CACHE_PREFIX_RATE_LIMIT};
use crate::errors::{AppError, AppResult};

/// Fixed-window request counter.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request for `identifier` in the current window.
    /// Returns (current_count, is_allowed).
    async fn check(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)>;
}

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis.
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    /// Check connectivity with PING.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    /// Check and increment rate limit counter.
    ///
    /// INCR and TTL run in one MULTI block; a counter that comes back without
    /// a TTL (a fresh window, or one whose EXPIRE never landed) gets one.
    /// Plain EXPIRE keeps this working on Redis releases before 7.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        let (count, ttl): (u64, i64) = redis::pipe()
            .atomic()
            .incr(&key, 1u64)
            .ttl(&key)
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;

        if lacks_expiry(ttl) {
            let _: () = conn
                .expire(&key, window_seconds as i64)
                .await
                .map_err(cache_error)?;
        }

        Ok((count, count <= max_requests))
    }
}

#[async_trait]
impl RateLimiter for Cache {
    async fn check(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        self.check_rate_limit(identifier, max_requests, window_seconds)
            .await
    }
}

/// TTL reply for a key that exists but never expires.
fn lacks_expiry(ttl: i64) -> bool {
    ttl == -1
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}
