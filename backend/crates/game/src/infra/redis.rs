//! Redis Key-Value Cache

use std::time::Duration;

use redis::aio::ConnectionManager;

use crate::domain::repository::KeyValueCache;
use crate::error::{CacheError, CacheResult};

/// Redis-backed key-value cache with sliding expiration.
///
/// `GETEX` re-arms the expiration window on every read, which gives
/// every entry sliding-TTL semantics. The connection manager reconnects
/// on its own; a dead Redis surfaces as `CacheError::Backend` and the
/// application layer degrades to store-only operation.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    sliding_ttl: Duration,
}

impl RedisCache {
    pub fn new(conn: ConnectionManager, sliding_ttl: Duration) -> Self {
        Self { conn, sliding_ttl }
    }

    /// Connect to Redis at `url`.
    pub async fn connect(url: &str, sliding_ttl: Duration) -> CacheResult<Self> {
        let client = redis::Client::open(url).map_err(to_cache_error)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(to_cache_error)?;
        Ok(Self::new(conn, sliding_ttl))
    }
}

impl KeyValueCache for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GETEX")
            .arg(key)
            .arg("EX")
            .arg(self.sliding_ttl.as_secs())
            .query_async(&mut conn)
            .await
            .map_err(to_cache_error)?;
        Ok(value)
    }

    async fn peek(&self, key: &str) -> CacheResult<Option<String>> {
        // Plain GET leaves the key's TTL as written
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(to_cache_error)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()> {
        let ttl = ttl.unwrap_or(self.sliding_ttl);
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async::<()>(&mut conn)
            .await
            .map_err(to_cache_error)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("DEL")
            .arg(key)
            .query_async::<()>(&mut conn)
            .await
            .map_err(to_cache_error)?;
        Ok(())
    }
}

fn to_cache_error(err: redis::RedisError) -> CacheError {
    CacheError::Backend(err.to_string())
}
