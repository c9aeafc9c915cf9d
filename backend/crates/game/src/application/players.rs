//! Player Access Service
//!
//! Cache-aside reads and writes for individual players. Reads consult
//! the cache first and fall back to the authoritative store; writes
//! commit to the store first and then invalidate or refresh the
//! affected cache entries best-effort. Holds no mutable state beyond
//! references to its collaborators, so it is safe for unlimited
//! concurrent invocation.

use std::sync::Arc;

use kernel::id::{PlayerId, RegionId};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::application::cache_ops;
use crate::application::config::GameConfig;
use crate::application::keys;
use crate::domain::entities::{NewPlayer, Player, PlayerUpdate};
use crate::domain::repository::{KeyValueCache, PlayerStore};
use crate::error::{GameError, GameResult};

/// Cache-aside access to player records
pub struct PlayerAccess<C, S>
where
    C: KeyValueCache + Sync,
    S: PlayerStore + Sync,
{
    cache: Arc<C>,
    store: Arc<S>,
    config: Arc<GameConfig>,
}

impl<C, S> PlayerAccess<C, S>
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

    /// All players: read-through on the aggregate `"players"` key.
    ///
    /// A cached non-empty list is served without touching the store; on
    /// miss the full list is fetched, cached with the default TTL and
    /// returned. Store failures propagate; the cache is left untouched.
    pub async fn all(&self) -> GameResult<Vec<Player>> {
        if let Some(players) = self.cache_get_json::<Vec<Player>>(keys::PLAYERS).await {
            if !players.is_empty() {
                return Ok(players);
            }
        }

        let players = self.store.all().await?;
        self.cache_set_json(keys::PLAYERS, &players, None).await;
        Ok(players)
    }

    /// Point lookup by Telegram id.
    ///
    /// Reads the per-player cache entry, falls back to the store on
    /// miss. Deliberately does NOT repopulate the cache on miss: point
    /// reads are anonymous and high-frequency, and caching here would
    /// create a write amplification loop. Write paths own the entry.
    pub async fn by_telegram_id(&self, telegram_id: i64) -> GameResult<Option<Player>> {
        let key = keys::player(telegram_id);
        if let Some(player) = self.cache_get_json::<Player>(&key).await {
            return Ok(Some(player));
        }

        self.store.get_by_telegram_id(telegram_id).await
    }

    /// Create a player and cache it under its per-player key.
    ///
    /// Uniqueness of the Telegram id is enforced by the store
    /// (`DuplicateTelegramId`). The aggregate `"players"` entry is NOT
    /// invalidated: readers of the aggregate view may miss the new
    /// player until its TTL expires. Accepted staleness window.
    pub async fn create(&self, new_player: NewPlayer) -> GameResult<Player> {
        let player = self.store.insert(&new_player).await?;
        self.cache_set_json(&keys::player(player.telegram_id), &player, None)
            .await;
        Ok(player)
    }

    /// Update mutable fields of an existing player.
    ///
    /// Requires the player to exist. No cache entry is eagerly
    /// refreshed; cached views stay stale until TTL expiry or an
    /// explicit removal elsewhere.
    pub async fn update(&self, id: PlayerId, update: PlayerUpdate) -> GameResult<()> {
        if self.store.get_by_id(id).await?.is_none() {
            return Err(GameError::PlayerNotFound);
        }
        self.store.update(id, &update).await
    }

    /// Adjust a player's rating by `delta`.
    ///
    /// The store performs the adjustment atomically. On success the
    /// aggregate players and leaderboard snapshots are invalidated so
    /// the next read recomputes from the store. Returns `false` (a
    /// negative result, not an error) for an unknown Telegram id, in
    /// which case no cache entry is touched.
    pub async fn adjust_rating(&self, telegram_id: i64, delta: f64) -> GameResult<bool> {
        let adjusted = self.store.adjust_rating(telegram_id, delta).await?;
        if adjusted {
            self.cache_remove(keys::PLAYERS).await;
            self.cache_remove(keys::LEADERBOARD).await;
        }
        Ok(adjusted)
    }

    /// Delete a player and drop its per-player cache entry.
    ///
    /// Aggregate caches are not proactively cleaned; they self-heal at
    /// TTL expiry.
    pub async fn delete(&self, id: PlayerId) -> GameResult<()> {
        let player = self.store.get_by_id(id).await?;
        self.store.delete(id).await?;
        if let Some(player) = player {
            self.cache_remove(&keys::player(player.telegram_id)).await;
        }
        Ok(())
    }

    /// Assign a region to a player.
    ///
    /// Returns `false` when the player or region does not exist. On
    /// success the per-player profile entry is refreshed with the
    /// updated player - an explicit write-through, because region
    /// assignment is low-frequency and freshness is worth the write.
    pub async fn assign_region(&self, player_id: PlayerId, region_id: RegionId) -> GameResult<bool> {
        let assigned = self.store.assign_region(player_id, region_id).await?;
        if !assigned {
            return Ok(false);
        }

        if let Some(player) = self.store.get_by_id(player_id).await? {
            self.cache_set_json(&keys::player_profile(player.telegram_id), &player, None)
                .await;
        }
        Ok(true)
    }

    /// Players referred by the given player. Store passthrough.
    pub async fn referrals(&self, telegram_id: i64) -> GameResult<Vec<Player>> {
        self.store.referrals(telegram_id).await
    }

    /// The player who referred the given player, cache-aside on the
    /// `"referrer:{telegram_id}"` key.
    pub async fn referrer(&self, telegram_id: i64) -> GameResult<Option<Player>> {
        let key = keys::referrer(telegram_id);
        if let Some(player) = self.cache_get_json::<Player>(&key).await {
            return Ok(Some(player));
        }

        let referrer = self.store.referrer(telegram_id).await?;
        if let Some(player) = &referrer {
            self.cache_set_json(&key, player, None).await;
        }
        Ok(referrer)
    }

    /// Network endpoint of the player's assigned region. Store
    /// passthrough.
    pub async fn region_ip(&self, player_id: PlayerId) -> GameResult<Option<String>> {
        self.store.region_ip(player_id).await
    }

    // ========================================================================
    // Cache plumbing
    // ========================================================================

    async fn cache_get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = cache_ops::get(self.cache.as_ref(), self.config.cache_timeout, key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                // Corrupt entry: treat as a miss, the next write replaces it
                tracing::warn!(key, error = %e, "Cached value failed to deserialize");
                None
            }
        }
    }

    async fn cache_set_json<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<std::time::Duration>,
    ) {
        match serde_json::to_string(value) {
            Ok(raw) => {
                cache_ops::set(
                    self.cache.as_ref(),
                    self.config.cache_timeout,
                    key,
                    &raw,
                    ttl,
                )
                .await;
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to serialize value for cache, skipping");
            }
        }
    }

    async fn cache_remove(&self, key: &str) {
        cache_ops::remove(self.cache.as_ref(), self.config.cache_timeout, key).await;
    }
}
