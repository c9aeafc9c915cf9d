//! Game Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use crate::application::config::GameConfig;
use crate::domain::repository::{KeyValueCache, PlayerStore};
use crate::infra::postgres::PgPlayerStore;
use crate::infra::redis::RedisCache;
use crate::presentation::handlers::{self, GameAppState};
use crate::presentation::middleware::{ServiceAuth, require_service_token};

/// Create the game router with the Redis cache and PostgreSQL store
pub fn game_router(
    cache: RedisCache,
    store: PgPlayerStore,
    config: GameConfig,
    auth: ServiceAuth,
) -> Router {
    game_router_generic(cache, store, config, auth)
}

/// Create a generic game router for any cache/store implementation
pub fn game_router_generic<C, S>(
    cache: C,
    store: S,
    config: GameConfig,
    auth: ServiceAuth,
) -> Router
where
    C: KeyValueCache + Sync + Send + 'static,
    S: PlayerStore + Sync + Send + 'static,
{
    let state = GameAppState {
        cache: Arc::new(cache),
        store: Arc::new(store),
        config: Arc::new(config),
    };

    Router::new()
        // Privileged routes: service token required
        .route(
            "/players",
            get(handlers::list_players::<C, S>)
                .route_layer(from_fn_with_state(auth.clone(), require_service_token)),
        )
        .route(
            "/players/{id}",
            delete(handlers::delete_player::<C, S>)
                .route_layer(from_fn_with_state(auth, require_service_token)),
        )
        // Anonymous routes
        .route("/players", post(handlers::create_player::<C, S>))
        .route(
            "/players/{id}",
            get(handlers::get_player::<C, S>).put(handlers::update_player::<C, S>),
        )
        .route(
            "/players/{telegram_id}/rating",
            put(handlers::adjust_rating::<C, S>),
        )
        .route(
            "/players/referrals/{telegram_id}",
            get(handlers::referrals::<C, S>),
        )
        .route(
            "/players/referrer/{telegram_id}",
            get(handlers::referrer::<C, S>),
        )
        .route("/players/ip/{player_id}", get(handlers::region_ip::<C, S>))
        .route("/players/region", post(handlers::assign_region::<C, S>))
        .route("/leaders", get(handlers::leaders::<C, S>))
        .with_state(state)
}
