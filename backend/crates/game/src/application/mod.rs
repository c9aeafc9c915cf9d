//! Application Layer - Cache-aside services
//!
//! This layer orchestrates the authoritative store and the key-value
//! cache. The cache-aside policy lives here: reads are read-through on
//! miss, writes commit to the store first and then invalidate or
//! refresh; cache failures degrade to no-ops with a logged warning.

pub mod config;
pub mod keys;
pub mod leaderboard;
pub mod players;

mod cache_ops;
