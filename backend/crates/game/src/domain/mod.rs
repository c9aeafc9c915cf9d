//! Domain Layer - Entities and repository traits
//!
//! This layer contains:
//! - Domain entities (Player, Region, LeaderboardEntry)
//! - Repository traits for the authoritative store and the key-value cache

pub mod entities;
pub mod repository;
