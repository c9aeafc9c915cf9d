//! Repository Traits
//!
//! Interfaces for the authoritative player store and the key-value
//! cache. Implementations live in the infrastructure layer; the
//! application layer is generic over both so tests can substitute
//! in-memory fakes.

use std::time::Duration;

use kernel::id::{PlayerId, RegionId};

use crate::domain::entities::{NewPlayer, Player, PlayerUpdate};
use crate::error::{CacheResult, GameResult};

/// Authoritative player store. The single source of truth for player
/// data; failures here always propagate to the caller.
#[trait_variant::make(PlayerStore: Send)]
pub trait LocalPlayerStore {
    /// All players, unordered
    async fn all(&self) -> GameResult<Vec<Player>>;

    /// Point lookup by internal id
    async fn get_by_id(&self, id: PlayerId) -> GameResult<Option<Player>>;

    /// Point lookup by Telegram id
    async fn get_by_telegram_id(&self, telegram_id: i64) -> GameResult<Option<Player>>;

    /// Top `count` players ordered by rating descending, ties broken by
    /// ascending Telegram id so results are stable across calls
    async fn top_by_rating(&self, count: i64) -> GameResult<Vec<Player>>;

    /// Insert a new player; fails with `DuplicateTelegramId` when the
    /// Telegram id is already taken
    async fn insert(&self, player: &NewPlayer) -> GameResult<Player>;

    /// Update mutable fields of an existing player
    async fn update(&self, id: PlayerId, update: &PlayerUpdate) -> GameResult<()>;

    /// Atomically adjust a player's rating by `delta`; returns `false`
    /// when no player with that Telegram id exists
    async fn adjust_rating(&self, telegram_id: i64, delta: f64) -> GameResult<bool>;

    /// Delete a player
    async fn delete(&self, id: PlayerId) -> GameResult<()>;

    /// Players referred by the given player
    async fn referrals(&self, telegram_id: i64) -> GameResult<Vec<Player>>;

    /// The player who referred the given player, if any
    async fn referrer(&self, telegram_id: i64) -> GameResult<Option<Player>>;

    /// Assign a region to a player; returns `false` when the player or
    /// the region does not exist
    async fn assign_region(&self, player_id: PlayerId, region_id: RegionId) -> GameResult<bool>;

    /// Network endpoint of the player's assigned region, if any
    async fn region_ip(&self, player_id: PlayerId) -> GameResult<Option<String>>;
}

/// Distributed key-value cache with per-key string values and sliding
/// expiration. Values are opaque serialized forms owned by the caller.
/// Errors from this trait are absorbed by the application layer - the
/// cache is a performance optimization that is always safe to drop.
#[trait_variant::make(KeyValueCache: Send)]
pub trait LocalKeyValueCache {
    /// Fetch a value, re-arming its sliding expiration window
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Fetch a value without touching its expiration. For entries that
    /// must expire on their own schedule regardless of read traffic
    async fn peek(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store a value with the given TTL, or the backend default when
    /// `None`
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()>;

    /// Remove a key; removing an absent key is not an error
    async fn remove(&self, key: &str) -> CacheResult<()>;
}
