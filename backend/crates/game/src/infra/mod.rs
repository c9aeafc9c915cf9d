//! Infrastructure Layer
//!
//! PostgreSQL store and Redis cache implementations.

pub mod postgres;
pub mod redis;

pub use postgres::PgPlayerStore;
pub use redis::RedisCache;
