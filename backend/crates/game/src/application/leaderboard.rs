//! Leaderboard Service
//!
//! The leaderboard is a read-mostly snapshot: an immutable list of
//! (telegram id, rating) pairs cached under a single key and replaced
//! wholesale on recomputation. It is never mutated in place - any
//! rating-affecting write invalidates the key and the next read
//! recomputes the full ordering from the authoritative store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::cache_ops;
use crate::application::config::GameConfig;
use crate::application::keys;
use crate::domain::entities::LeaderboardEntry;
use crate::domain::repository::{KeyValueCache, PlayerStore};
use crate::error::GameResult;

/// Default number of entries returned when the caller does not specify
pub const DEFAULT_TOP_COUNT: i64 = 100;

/// Cached form of the leaderboard. The limit it was computed with is
/// stored alongside the entries: a snapshot can answer any request for
/// that many entries or fewer, but a larger request must go back to
/// the store.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    limit: i64,
    entries: Vec<LeaderboardEntry>,
}

/// Cached leaderboard snapshot over the player store
pub struct Leaderboard<C, S>
where
    C: KeyValueCache + Sync,
    S: PlayerStore + Sync,
{
    cache: Arc<C>,
    store: Arc<S>,
    config: Arc<GameConfig>,
}

impl<C, S> Leaderboard<C, S>
where
    C: KeyValueCache + Sync,
    S: PlayerStore + Sync,
{
    pub fn new(cache: Arc<C>, store: Arc<S>, config: Arc<GameConfig>) -> Self {
        Self {
            cache,
            store,
            config,
        }
    }

    /// Top `count` players by rating, descending; ties broken by
    /// ascending Telegram id so the order is stable across calls.
    ///
    /// Served from the snapshot when it was computed with at least this
    /// limit, truncated to `count`; otherwise the projection is
    /// recomputed from the store and cached with the (short)
    /// leaderboard TTL. A snapshot is allowed to be stale within that
    /// window by design. A non-positive `count` yields an empty list
    /// without touching cache or store.
    pub async fn top(&self, count: i64) -> GameResult<Vec<LeaderboardEntry>> {
        if count <= 0 {
            return Ok(Vec::new());
        }

        let timeout = self.config.cache_timeout;

        // peek, not get: the snapshot must expire on its own schedule,
        // so reads do not re-arm the sliding window
        if let Some(raw) = cache_ops::peek(self.cache.as_ref(), timeout, keys::LEADERBOARD).await {
            match serde_json::from_str::<Snapshot>(&raw) {
                Ok(mut snapshot) if !snapshot.entries.is_empty() && snapshot.limit >= count => {
                    snapshot.entries.truncate(count as usize);
                    return Ok(snapshot.entries);
                }
                // Empty or computed with a smaller limit: recompute
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Cached leaderboard failed to deserialize");
                }
            }
        }

        let players = self.store.top_by_rating(count).await?;
        let entries: Vec<LeaderboardEntry> =
            players.iter().map(LeaderboardEntry::from_player).collect();

        let snapshot = Snapshot {
            limit: count,
            entries,
        };
        match serde_json::to_string(&snapshot) {
            Ok(raw) => {
                cache_ops::set(
                    self.cache.as_ref(),
                    timeout,
                    keys::LEADERBOARD,
                    &raw,
                    Some(self.config.leaderboard_ttl),
                )
                .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize leaderboard for cache, skipping");
            }
        }

        Ok(snapshot.entries)
    }
}
