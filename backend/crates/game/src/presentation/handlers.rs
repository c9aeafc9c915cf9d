//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::error::app_error::AppError;
use kernel::id::{PlayerId, RegionId};
use std::sync::Arc;

use crate::application::config::GameConfig;
use crate::application::leaderboard::{DEFAULT_TOP_COUNT, Leaderboard};
use crate::application::players::PlayerAccess;
use crate::domain::entities::{NewPlayer, Player, PlayerUpdate};
use crate::domain::repository::{KeyValueCache, PlayerStore};
use crate::error::{GameError, GameResult};
use crate::presentation::dto::{
    AdjustRatingRequest, AssignRegionRequest, LeadersQuery, RegionIpResponse,
};

/// Shared state for game handlers
pub struct GameAppState<C, S>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    pub cache: Arc<C>,
    pub store: Arc<S>,
    pub config: Arc<GameConfig>,
}

// Manual impl: derive(Clone) would demand C: Clone, S: Clone even
// though only the Arcs are cloned.
impl<C, S> Clone for GameAppState<C, S>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C, S> GameAppState<C, S>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    fn players(&self) -> PlayerAccess<C, S> {
        PlayerAccess::new(self.cache.clone(), self.store.clone(), self.config.clone())
    }

    fn leaderboard(&self) -> Leaderboard<C, S> {
        Leaderboard::new(self.cache.clone(), self.store.clone(), self.config.clone())
    }
}

// ============================================================================
// Players
// ============================================================================

/// GET /api/players (requires service token)
pub async fn list_players<C, S>(
    State(state): State<GameAppState<C, S>>,
) -> GameResult<Json<Vec<Player>>>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    let players = state.players().all().await?;
    Ok(Json(players))
}

/// GET /api/players/{telegram_id}
pub async fn get_player<C, S>(
    State(state): State<GameAppState<C, S>>,
    Path(telegram_id): Path<i64>,
) -> GameResult<Json<Player>>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    let player = state
        .players()
        .by_telegram_id(telegram_id)
        .await?
        .ok_or(GameError::PlayerNotFound)?;
    Ok(Json(player))
}

/// POST /api/players
pub async fn create_player<C, S>(
    State(state): State<GameAppState<C, S>>,
    Json(req): Json<NewPlayer>,
) -> GameResult<Json<Player>>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    let player = state.players().create(req).await?;
    Ok(Json(player))
}

/// PUT /api/players/{id}
pub async fn update_player<C, S>(
    State(state): State<GameAppState<C, S>>,
    Path(id): Path<i64>,
    Json(req): Json<PlayerUpdate>,
) -> GameResult<StatusCode>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    state.players().update(PlayerId::from_i64(id), req).await?;
    Ok(StatusCode::OK)
}

/// PUT /api/players/{telegram_id}/rating
pub async fn adjust_rating<C, S>(
    State(state): State<GameAppState<C, S>>,
    Path(telegram_id): Path<i64>,
    Json(req): Json<AdjustRatingRequest>,
) -> GameResult<StatusCode>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    if state.players().adjust_rating(telegram_id, req.delta).await? {
        Ok(StatusCode::OK)
    } else {
        Err(GameError::PlayerNotFound)
    }
}

/// DELETE /api/players/{id} (requires service token)
pub async fn delete_player<C, S>(
    State(state): State<GameAppState<C, S>>,
    Path(id): Path<i64>,
) -> GameResult<StatusCode>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    state.players().delete(PlayerId::from_i64(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Leaderboard
// ============================================================================

/// GET /api/leaders
pub async fn leaders<C, S>(
    State(state): State<GameAppState<C, S>>,
    Query(query): Query<LeadersQuery>,
) -> Result<impl IntoResponse, GameError>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    let count = query.count.unwrap_or(DEFAULT_TOP_COUNT);
    let entries = state.leaderboard().top(count).await?;

    if entries.is_empty() {
        return Ok(AppError::not_found("No leaders found").into_response());
    }
    Ok(Json(entries).into_response())
}

// ============================================================================
// Referrals
// ============================================================================

/// GET /api/players/referrals/{telegram_id}
pub async fn referrals<C, S>(
    State(state): State<GameAppState<C, S>>,
    Path(telegram_id): Path<i64>,
) -> GameResult<Json<Vec<Player>>>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    let referrals = state.players().referrals(telegram_id).await?;
    Ok(Json(referrals))
}

/// GET /api/players/referrer/{telegram_id}
pub async fn referrer<C, S>(
    State(state): State<GameAppState<C, S>>,
    Path(telegram_id): Path<i64>,
) -> Result<Json<Player>, AppError>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    let referrer = state
        .players()
        .referrer(telegram_id)
        .await
        .map_err(|e| e.to_app_error())?;

    referrer
        .map(Json)
        .ok_or_else(|| AppError::not_found("Referrer not found"))
}

// ============================================================================
// Regions
// ============================================================================

/// GET /api/players/ip/{player_id}
pub async fn region_ip<C, S>(
    State(state): State<GameAppState<C, S>>,
    Path(player_id): Path<i64>,
) -> Result<Json<RegionIpResponse>, AppError>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    let ip = state
        .players()
        .region_ip(PlayerId::from_i64(player_id))
        .await
        .map_err(|e| e.to_app_error())?;

    ip.map(|region_ip| Json(RegionIpResponse { region_ip }))
        .ok_or_else(|| AppError::not_found("Player has no region assigned"))
}

/// POST /api/players/region
pub async fn assign_region<C, S>(
    State(state): State<GameAppState<C, S>>,
    Json(req): Json<AssignRegionRequest>,
) -> Result<StatusCode, AppError>
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    let assigned = state
        .players()
        .assign_region(
            PlayerId::from_i64(req.player_id),
            RegionId::from_i64(req.region_id),
        )
        .await
        .map_err(|e| e.to_app_error())?;

    if assigned {
        Ok(StatusCode::OK)
    } else {
        Err(AppError::bad_request("Player or region not found"))
    }
}
