//! Bounded, failure-absorbing cache operations.
//!
//! Every cache call in the application layer goes through these
//! helpers: each one is wrapped in the configured timeout and any
//! error or timeout is logged at warn level and swallowed. A get
//! degrades to a miss, a set or remove to a no-op - the caller then
//! proceeds against the authoritative store as usual.

use std::time::Duration;

use crate::domain::repository::KeyValueCache;
use crate::error::CacheError;

pub(crate) async fn get<C: KeyValueCache + Sync>(
    cache: &C,
    timeout: Duration,
    key: &str,
) -> Option<String> {
    match tokio::time::timeout(timeout, cache.get(key)).await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            tracing::warn!(key, error = %e, "Cache get failed, treating as miss");
            None
        }
        Err(_) => {
            tracing::warn!(key, error = %CacheError::Timeout, "Cache get timed out, treating as miss");
            None
        }
    }
}

pub(crate) async fn peek<C: KeyValueCache + Sync>(
    cache: &C,
    timeout: Duration,
    key: &str,
) -> Option<String> {
    match tokio::time::timeout(timeout, cache.peek(key)).await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            tracing::warn!(key, error = %e, "Cache peek failed, treating as miss");
            None
        }
        Err(_) => {
            tracing::warn!(key, error = %CacheError::Timeout, "Cache peek timed out, treating as miss");
            None
        }
    }
}

pub(crate) async fn set<C: KeyValueCache + Sync>(
    cache: &C,
    timeout: Duration,
    key: &str,
    value: &str,
    ttl: Option<Duration>,
) {
    match tokio::time::timeout(timeout, cache.set(key, value, ttl)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(key, error = %e, "Cache set failed, skipping");
        }
        Err(_) => {
            tracing::warn!(key, error = %CacheError::Timeout, "Cache set timed out, skipping");
        }
    }
}

pub(crate) async fn remove<C: KeyValueCache + Sync>(cache: &C, timeout: Duration, key: &str) {
    match tokio::time::timeout(timeout, cache.remove(key)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(key, error = %e, "Cache remove failed, entry will expire via TTL");
        }
        Err(_) => {
            tracing::warn!(key, error = %CacheError::Timeout, "Cache remove timed out, entry will expire via TTL");
        }
    }
}
