//! Game Backend Module - players, ratings, leaderboard
//!
//! Clean Architecture structure:
//! - `domain/` - Entities and repository traits
//! - `application/` - Cache-aside services and configuration
//! - `infra/` - PostgreSQL store and Redis cache implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Caching Model
//! - The store is the single source of truth; every cached value is a
//!   derived, droppable view of it
//! - Reads go cache-first and repopulate on miss where documented;
//!   writes commit to the store first, then invalidate or refresh
//! - A failing or slow cache degrades to store-only operation and is
//!   never allowed to fail a request

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::GameConfig;
pub use error::{CacheError, CacheResult, GameError, GameResult};
pub use infra::postgres::PgPlayerStore;
pub use infra::redis::RedisCache;
pub use presentation::router::game_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
