//! Unit tests for the cache-aside player services
//!
//! The application layer is exercised against in-memory fakes of the
//! store and cache that count their calls, so cache-hit/miss behavior
//! and invalidation are observable.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use kernel::id::{PlayerId, RegionId};

use crate::application::config::GameConfig;
use crate::application::keys;
use crate::application::leaderboard::Leaderboard;
use crate::application::players::PlayerAccess;
use crate::domain::entities::{NewPlayer, Player, PlayerUpdate, Region};
use crate::domain::repository::{KeyValueCache, PlayerStore};
use crate::error::{CacheError, CacheResult, GameError, GameResult};

// ============================================================================
// Fakes
// ============================================================================

#[derive(Default)]
struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    fail: AtomicBool,
    remove_calls: AtomicUsize,
    // Counts reads that re-arm the sliding window, i.e. get but not peek
    sliding_gets: AtomicUsize,
}

impl MemoryCache {
    fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    fn put(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn go_offline(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.sliding_gets.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(CacheError::Backend("connection refused".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn peek(&self, key: &str) -> CacheResult<Option<String>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CacheError::Backend("connection refused".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> CacheResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CacheError::Backend("connection refused".to_string()));
        }
        self.put(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> CacheResult<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(CacheError::Backend("connection refused".to_string()));
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[derive(Default)]
struct MemoryStore {
    players: Mutex<Vec<Player>>,
    regions: Mutex<Vec<Region>>,
    next_id: AtomicI64,
    fail: AtomicBool,
    all_calls: AtomicUsize,
    point_calls: AtomicUsize,
    top_calls: AtomicUsize,
}

impl MemoryStore {
    fn with_region(self, id: i64, name: &str, ip: &str) -> Self {
        self.regions.lock().unwrap().push(Region {
            id: RegionId::from_i64(id),
            name: name.to_string(),
            ip: ip.to_string(),
        });
        self
    }

    fn go_offline(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> GameResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(GameError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn set_rating(&self, telegram_id: i64, rating: f64) {
        let mut players = self.players.lock().unwrap();
        if let Some(player) = players.iter_mut().find(|p| p.telegram_id == telegram_id) {
            player.rating = rating;
        }
    }
}

impl PlayerStore for MemoryStore {
    async fn all(&self) -> GameResult<Vec<Player>> {
        self.check_online()?;
        self.all_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.players.lock().unwrap().clone())
    }

    async fn get_by_id(&self, id: PlayerId) -> GameResult<Option<Player>> {
        self.check_online()?;
        Ok(self
            .players
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn get_by_telegram_id(&self, telegram_id: i64) -> GameResult<Option<Player>> {
        self.check_online()?;
        self.point_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .players
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.telegram_id == telegram_id)
            .cloned())
    }

    async fn top_by_rating(&self, count: i64) -> GameResult<Vec<Player>> {
        self.check_online()?;
        self.top_calls.fetch_add(1, Ordering::SeqCst);
        let mut players = self.players.lock().unwrap().clone();
        players.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.telegram_id.cmp(&b.telegram_id))
        });
        players.truncate(count as usize);
        Ok(players)
    }

    async fn insert(&self, new_player: &NewPlayer) -> GameResult<Player> {
        self.check_online()?;
        let mut players = self.players.lock().unwrap();
        if players.iter().any(|p| p.telegram_id == new_player.telegram_id) {
            return Err(GameError::DuplicateTelegramId(new_player.telegram_id));
        }
        let player = Player {
            id: PlayerId::from_i64(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            telegram_id: new_player.telegram_id,
            name: new_player.name.clone(),
            rating: 0.0,
            region_id: None,
            referrer_id: new_player.referrer_id,
            created_at: Utc::now(),
        };
        players.push(player.clone());
        Ok(player)
    }

    async fn update(&self, id: PlayerId, update: &PlayerUpdate) -> GameResult<()> {
        self.check_online()?;
        let mut players = self.players.lock().unwrap();
        let player = players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GameError::PlayerNotFound)?;
        player.name = update.name.clone();
        player.rating = update.rating;
        Ok(())
    }

    async fn adjust_rating(&self, telegram_id: i64, delta: f64) -> GameResult<bool> {
        self.check_online()?;
        let mut players = self.players.lock().unwrap();
        match players.iter_mut().find(|p| p.telegram_id == telegram_id) {
            Some(player) => {
                player.rating += delta;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: PlayerId) -> GameResult<()> {
        self.check_online()?;
        self.players.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    async fn referrals(&self, telegram_id: i64) -> GameResult<Vec<Player>> {
        self.check_online()?;
        Ok(self
            .players
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.referrer_id == Some(telegram_id))
            .cloned()
            .collect())
    }

    async fn referrer(&self, telegram_id: i64) -> GameResult<Option<Player>> {
        self.check_online()?;
        let players = self.players.lock().unwrap();
        let referrer_id = players
            .iter()
            .find(|p| p.telegram_id == telegram_id)
            .and_then(|p| p.referrer_id);
        Ok(referrer_id
            .and_then(|id| players.iter().find(|p| p.telegram_id == id))
            .cloned())
    }

    async fn assign_region(&self, player_id: PlayerId, region_id: RegionId) -> GameResult<bool> {
        self.check_online()?;
        if !self.regions.lock().unwrap().iter().any(|r| r.id == region_id) {
            return Ok(false);
        }
        let mut players = self.players.lock().unwrap();
        match players.iter_mut().find(|p| p.id == player_id) {
            Some(player) => {
                player.region_id = Some(region_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn region_ip(&self, player_id: PlayerId) -> GameResult<Option<String>> {
        self.check_online()?;
        let players = self.players.lock().unwrap();
        let region_id = players
            .iter()
            .find(|p| p.id == player_id)
            .and_then(|p| p.region_id);
        Ok(region_id.and_then(|id| {
            self.regions
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .map(|r| r.ip.clone())
        }))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn new_player(telegram_id: i64, name: &str) -> NewPlayer {
    NewPlayer {
        telegram_id,
        name: name.to_string(),
        referrer_id: None,
    }
}

fn services(
    cache: &Arc<MemoryCache>,
    store: &Arc<MemoryStore>,
) -> (
    PlayerAccess<MemoryCache, MemoryStore>,
    Leaderboard<MemoryCache, MemoryStore>,
) {
    let config = Arc::new(GameConfig::default());
    (
        PlayerAccess::new(cache.clone(), store.clone(), config.clone()),
        Leaderboard::new(cache.clone(), store.clone(), config),
    )
}

async fn seed_ratings(players: &PlayerAccess<MemoryCache, MemoryStore>, ratings: &[(i64, f64)]) {
    for (telegram_id, rating) in ratings {
        let created = players
            .create(new_player(*telegram_id, &format!("p{telegram_id}")))
            .await
            .unwrap();
        players
            .update(
                created.id,
                PlayerUpdate {
                    name: created.name.clone(),
                    rating: *rating,
                },
            )
            .await
            .unwrap();
    }
}

// ============================================================================
// Aggregate reads
// ============================================================================

#[tokio::test]
async fn all_players_second_read_is_a_cache_hit() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, _) = services(&cache, &store);

    players.create(new_player(1, "alice")).await.unwrap();
    players.create(new_player(2, "bob")).await.unwrap();

    let first = players.all().await.unwrap();
    let second = players.all().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(store.all_calls.load(Ordering::SeqCst), 1);
    assert!(cache.contains(keys::PLAYERS));
}

#[tokio::test]
async fn all_players_store_failure_propagates_and_leaves_cache_untouched() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, _) = services(&cache, &store);

    store.go_offline();

    let err = players.all().await.unwrap_err();
    assert!(matches!(err, GameError::Database(_)));
    assert!(!cache.contains(keys::PLAYERS));
}

#[tokio::test]
async fn cache_outage_degrades_reads_to_the_store() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, _) = services(&cache, &store);

    players.create(new_player(1, "alice")).await.unwrap();
    cache.go_offline();

    // Reads and writes still succeed against the authoritative store
    assert_eq!(players.all().await.unwrap().len(), 1);
    assert!(players.by_telegram_id(1).await.unwrap().is_some());
    players.create(new_player(2, "bob")).await.unwrap();
    assert_eq!(players.all().await.unwrap().len(), 2);
}

// ============================================================================
// Point reads
// ============================================================================

#[tokio::test]
async fn point_read_does_not_populate_the_cache() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, _) = services(&cache, &store);

    let created = store.insert(&new_player(5, "carol")).await.unwrap();

    // Two misses, two store lookups - the read path never writes
    assert_eq!(players.by_telegram_id(5).await.unwrap(), Some(created.clone()));
    assert_eq!(players.by_telegram_id(5).await.unwrap(), Some(created));
    assert_eq!(store.point_calls.load(Ordering::SeqCst), 2);
    assert!(!cache.contains(&keys::player(5)));
}

#[tokio::test]
async fn create_then_point_read_returns_the_created_player() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, _) = services(&cache, &store);

    let created = players.create(new_player(7, "dave")).await.unwrap();
    let read = players.by_telegram_id(7).await.unwrap();

    assert_eq!(read, Some(created));
    // Served from the per-player entry written on create
    assert_eq!(store.point_calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn create_rejects_duplicate_telegram_id() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, _) = services(&cache, &store);

    players.create(new_player(1, "alice")).await.unwrap();
    let err = players.create(new_player(1, "imposter")).await.unwrap_err();
    assert!(matches!(err, GameError::DuplicateTelegramId(1)));
}

#[tokio::test]
async fn create_leaves_aggregate_snapshot_stale_until_ttl() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, _) = services(&cache, &store);

    players.create(new_player(1, "alice")).await.unwrap();
    let before = players.all().await.unwrap();

    players.create(new_player(2, "bob")).await.unwrap();

    // Accepted staleness window: the aggregate still serves the old
    // snapshot because create does not invalidate it
    let after = players.all().await.unwrap();
    assert_eq!(after, before);
    assert_eq!(store.all_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn update_requires_an_existing_player() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, _) = services(&cache, &store);

    let err = players
        .update(
            PlayerId::from_i64(99),
            PlayerUpdate {
                name: "ghost".to_string(),
                rating: 1.0,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GameError::PlayerNotFound));
}

#[tokio::test]
async fn delete_removes_the_per_player_entry() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, _) = services(&cache, &store);

    let created = players.create(new_player(3, "erin")).await.unwrap();
    assert!(cache.contains(&keys::player(3)));

    players.delete(created.id).await.unwrap();

    assert!(!cache.contains(&keys::player(3)));
    assert!(players.by_telegram_id(3).await.unwrap().is_none());
}

// ============================================================================
// Rating adjustment and invalidation
// ============================================================================

#[tokio::test]
async fn adjust_rating_invalidates_aggregate_snapshots() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, leaderboard) = services(&cache, &store);

    seed_ratings(&players, &[(1, 10.0), (2, 20.0)]).await;
    players.all().await.unwrap();
    leaderboard.top(10).await.unwrap();
    assert!(cache.contains(keys::PLAYERS));
    assert!(cache.contains(keys::LEADERBOARD));

    assert!(players.adjust_rating(1, 15.0).await.unwrap());

    assert!(!cache.contains(keys::PLAYERS));
    assert!(!cache.contains(keys::LEADERBOARD));

    // Next read recomputes from the store and sees the new rating
    let entries = leaderboard.top(10).await.unwrap();
    assert_eq!(entries[0].telegram_id, 1);
    assert_eq!(entries[0].rating, 25.0);
}

#[tokio::test]
async fn adjust_rating_for_unknown_player_is_negative_without_invalidation() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, leaderboard) = services(&cache, &store);

    seed_ratings(&players, &[(1, 10.0)]).await;
    leaderboard.top(10).await.unwrap();

    assert!(!players.adjust_rating(42, 5.0).await.unwrap());

    assert!(cache.contains(keys::LEADERBOARD));
    assert_eq!(cache.remove_calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Leaderboard
// ============================================================================

#[tokio::test]
async fn leaderboard_orders_by_rating_with_stable_tie_break() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, leaderboard) = services(&cache, &store);

    // A:50 B:90 C:70 D:90 - the two 90s take the first two slots in
    // ascending telegram id order, C follows, A is cut
    seed_ratings(&players, &[(1, 50.0), (2, 90.0), (3, 70.0), (4, 90.0)]).await;

    let top = leaderboard.top(3).await.unwrap();
    let ids: Vec<i64> = top.iter().map(|e| e.telegram_id).collect();
    assert_eq!(ids, vec![2, 4, 3]);
    assert_eq!(top[0].rating, 90.0);
    assert_eq!(top[1].rating, 90.0);
    assert_eq!(top[2].rating, 70.0);

    // Identical call ordering on repeat
    let again = leaderboard.top(3).await.unwrap();
    assert_eq!(top, again);
}

#[tokio::test]
async fn leaderboard_snapshot_is_served_stale_until_invalidated() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, leaderboard) = services(&cache, &store);

    seed_ratings(&players, &[(1, 10.0), (2, 20.0)]).await;
    let before = leaderboard.top(10).await.unwrap();
    assert_eq!(before[0].telegram_id, 2);

    // A direct store change without invalidation: the snapshot still
    // serves the old ordering. Documented staleness, not a failure.
    store.set_rating(1, 100.0);
    let stale = leaderboard.top(10).await.unwrap();
    assert_eq!(stale, before);

    // A rating write through the service invalidates; the next read
    // reflects the store
    assert!(players.adjust_rating(1, 1.0).await.unwrap());
    let fresh = leaderboard.top(10).await.unwrap();
    assert_eq!(fresh[0].telegram_id, 1);
}

#[tokio::test]
async fn leaderboard_cached_snapshot_respects_smaller_count() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, leaderboard) = services(&cache, &store);

    seed_ratings(&players, &[(1, 50.0), (2, 90.0), (3, 70.0), (4, 90.0)]).await;

    // Warm with a wide limit, then ask for fewer: the snapshot answers,
    // truncated to the requested count
    assert_eq!(leaderboard.top(10).await.unwrap().len(), 4);
    let top = leaderboard.top(3).await.unwrap();
    let ids: Vec<i64> = top.iter().map(|e| e.telegram_id).collect();
    assert_eq!(ids, vec![2, 4, 3]);
    assert_eq!(store.top_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn leaderboard_larger_count_recomputes_from_store() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, leaderboard) = services(&cache, &store);

    seed_ratings(&players, &[(1, 50.0), (2, 90.0), (3, 70.0), (4, 90.0)]).await;

    assert_eq!(leaderboard.top(2).await.unwrap().len(), 2);
    // The narrow snapshot cannot answer a wider request
    assert_eq!(leaderboard.top(4).await.unwrap().len(), 4);
    assert_eq!(store.top_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn leaderboard_non_positive_count_is_empty() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, leaderboard) = services(&cache, &store);

    seed_ratings(&players, &[(1, 50.0)]).await;

    assert!(leaderboard.top(0).await.unwrap().is_empty());
    assert!(leaderboard.top(-3).await.unwrap().is_empty());
    assert_eq!(store.top_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn leaderboard_reads_do_not_rearm_sliding_expiration() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, leaderboard) = services(&cache, &store);

    seed_ratings(&players, &[(1, 10.0), (2, 20.0)]).await;

    // Miss, then hit: the snapshot carries its own TTL and neither read
    // may extend it
    leaderboard.top(10).await.unwrap();
    leaderboard.top(10).await.unwrap();
    assert_eq!(cache.sliding_gets.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn leaderboard_empty_store_yields_empty_list() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (_, leaderboard) = services(&cache, &store);

    assert!(leaderboard.top(10).await.unwrap().is_empty());
}

// ============================================================================
// Regions and referrals
// ============================================================================

#[tokio::test]
async fn assign_region_writes_through_the_profile_entry() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default().with_region(1, "eu", "10.0.0.1"));
    let (players, _) = services(&cache, &store);

    let created = players.create(new_player(8, "frank")).await.unwrap();
    assert!(players
        .assign_region(created.id, RegionId::from_i64(1))
        .await
        .unwrap());

    // Explicit write-through: the profile entry holds the updated player
    let raw = cache
        .entries
        .lock()
        .unwrap()
        .get(&keys::player_profile(8))
        .cloned()
        .expect("profile entry cached");
    let cached: Player = serde_json::from_str(&raw).unwrap();
    assert_eq!(cached.region_id, Some(RegionId::from_i64(1)));

    assert_eq!(
        players.region_ip(created.id).await.unwrap().as_deref(),
        Some("10.0.0.1")
    );
}

#[tokio::test]
async fn assign_region_unknown_region_is_negative() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, _) = services(&cache, &store);

    let created = players.create(new_player(9, "grace")).await.unwrap();
    assert!(!players
        .assign_region(created.id, RegionId::from_i64(404))
        .await
        .unwrap());
    assert!(!cache.contains(&keys::player_profile(9)));
}

#[tokio::test]
async fn referrer_lookup_is_cached() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, _) = services(&cache, &store);

    players.create(new_player(1, "alice")).await.unwrap();
    players
        .create(NewPlayer {
            telegram_id: 2,
            name: "bob".to_string(),
            referrer_id: Some(1),
        })
        .await
        .unwrap();

    let referrer = players.referrer(2).await.unwrap().expect("referrer");
    assert_eq!(referrer.telegram_id, 1);
    assert!(cache.contains(&keys::referrer(2)));

    // Second lookup is served from the cache
    let cached = players.referrer(2).await.unwrap().expect("referrer");
    assert_eq!(cached.telegram_id, 1);
}

#[tokio::test]
async fn referrals_lists_referred_players() {
    let cache = Arc::new(MemoryCache::default());
    let store = Arc::new(MemoryStore::default());
    let (players, _) = services(&cache, &store);

    players.create(new_player(1, "alice")).await.unwrap();
    for telegram_id in [2, 3] {
        players
            .create(NewPlayer {
                telegram_id,
                name: format!("ref{telegram_id}"),
                referrer_id: Some(1),
            })
            .await
            .unwrap();
    }

    let referrals = players.referrals(1).await.unwrap();
    assert_eq!(referrals.len(), 2);
    assert!(referrals.iter().all(|p| p.referrer_id == Some(1)));
}
