//! API DTOs (Data Transfer Objects)
//!
//! Player and leaderboard payloads reuse the domain entities directly -
//! they already serialize to the wire shape. Only request envelopes
//! that do not match an entity live here.

use serde::{Deserialize, Serialize};

// ============================================================================
// Rating
// ============================================================================

/// Rating adjustment request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustRatingRequest {
    /// Signed delta applied to the player's current rating
    pub delta: f64,
}

// ============================================================================
// Regions
// ============================================================================

/// Region assignment request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRegionRequest {
    pub player_id: i64,
    pub region_id: i64,
}

/// Region endpoint response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionIpResponse {
    pub region_ip: String,
}

// ============================================================================
// Leaderboard
// ============================================================================

/// Optional query parameters for the leaderboard endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LeadersQuery {
    /// Number of entries to return (default 100)
    pub count: Option<i64>,
}
