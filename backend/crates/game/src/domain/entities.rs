//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::{PlayerId, RegionId};
use serde::{Deserialize, Serialize};

/// A player record. Owned by the authoritative store; cached copies are
/// serialized JSON snapshots of this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Internal identifier (database key)
    pub id: PlayerId,
    /// Telegram numeric id - the external-facing key, unique across players
    pub telegram_id: i64,
    pub name: String,
    pub rating: f64,
    /// Assigned game region, if any
    pub region_id: Option<RegionId>,
    /// Telegram id of the referring player, if any
    pub referrer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the client when creating a player. The store
/// assigns the identifier and creation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub telegram_id: i64,
    pub name: String,
    #[serde(default)]
    pub referrer_id: Option<i64>,
}

/// Mutable player fields for a full update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdate {
    pub name: String,
    pub rating: f64,
}

/// A game region with its network endpoint. Seeded at startup, rarely
/// mutated; players reference regions by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub ip: String,
}

/// One leaderboard row: a projection of (telegram id, rating). Derived,
/// never persisted authoritatively - always recomputed from the store on
/// cache miss and cached as an immutable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub telegram_id: i64,
    pub rating: f64,
}

impl LeaderboardEntry {
    pub fn from_player(player: &Player) -> Self {
        Self {
            telegram_id: player.telegram_id,
            rating: player.rating,
        }
    }
}
