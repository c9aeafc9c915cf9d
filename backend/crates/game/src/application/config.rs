//! Application Configuration
//!
//! TTLs and timeouts for the cache-aside layer. Deliberately a
//! construction-time value rather than compile-time constants so each
//! deployment can tune them without code changes.

use std::time::Duration;

/// Game application configuration
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Sliding TTL for individual player and referrer cache entries
    pub default_ttl: Duration,
    /// TTL for the leaderboard snapshot. Kept short: leaderboard data
    /// changes globally and staleness is visible to end users
    pub leaderboard_ttl: Duration,
    /// Bound on every single cache operation. Must stay well below the
    /// end-to-end request timeout so a degraded cache never makes the
    /// system slower than talking to the store directly
    pub cache_timeout: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300),
            leaderboard_ttl: Duration::from_secs(300),
            cache_timeout: Duration::from_millis(300),
        }
    }
}

impl GameConfig {
    /// Load overrides from the environment, falling back to defaults.
    ///
    /// Recognized variables: `CACHE_DEFAULT_TTL_SECS`,
    /// `CACHE_LEADERBOARD_TTL_SECS`, `CACHE_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: env_secs("CACHE_DEFAULT_TTL_SECS").unwrap_or(defaults.default_ttl),
            leaderboard_ttl: env_secs("CACHE_LEADERBOARD_TTL_SECS")
                .unwrap_or(defaults.leaderboard_ttl),
            cache_timeout: env_millis("CACHE_TIMEOUT_MS").unwrap_or(defaults.cache_timeout),
        }
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    std::env::var(name).ok()?.parse().ok().map(Duration::from_secs)
}

fn env_millis(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()?
        .parse()
        .ok()
        .map(Duration::from_millis)
}
