//! Cache Key Naming
//!
//! The key layout is a wire contract with existing deployments - the
//! exact strings matter. Two per-player prefixes exist historically:
//! `players:{telegram_id}` for the point-read path and
//! `player:{telegram_id}` for the region write-through path. Those two
//! views of the same player may diverge until their TTLs expire.

/// Aggregate list of all players
pub const PLAYERS: &str = "players";

/// Leaderboard snapshot
pub const LEADERBOARD: &str = "players:leaderboard";

/// Per-player entry used by the point-read and create paths
pub fn player(telegram_id: i64) -> String {
    format!("players:{telegram_id}")
}

/// Per-player entry refreshed by the region write-through path
pub fn player_profile(telegram_id: i64) -> String {
    format!("player:{telegram_id}")
}

/// Cached referrer lookup
pub fn referrer(telegram_id: i64) -> String {
    format!("referrer:{telegram_id}")
}
