//! PostgreSQL Player Store

use chrono::{DateTime, Utc};
use kernel::id::{PlayerId, RegionId};
use sqlx::PgPool;

use crate::domain::entities::{NewPlayer, Player, PlayerUpdate};
use crate::domain::repository::PlayerStore;
use crate::error::{GameError, GameResult};

/// PostgreSQL-backed authoritative player store
#[derive(Clone)]
pub struct PgPlayerStore {
    pool: PgPool,
}

impl PgPlayerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PLAYER_COLUMNS: &str = r#"
    player_id,
    telegram_id,
    player_name,
    rating,
    region_id,
    referrer_id,
    created_at
"#;

impl PlayerStore for PgPlayerStore {
    async fn all(&self) -> GameResult<Vec<Player>> {
        let rows = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players ORDER BY player_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PlayerRow::into_player).collect())
    }

    async fn get_by_id(&self, id: PlayerId) -> GameResult<Option<Player>> {
        let row = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players WHERE player_id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PlayerRow::into_player))
    }

    async fn get_by_telegram_id(&self, telegram_id: i64) -> GameResult<Option<Player>> {
        let row = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players WHERE telegram_id = $1"
        ))
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PlayerRow::into_player))
    }

    async fn top_by_rating(&self, count: i64) -> GameResult<Vec<Player>> {
        // telegram_id tie-break keeps the ordering deterministic for
        // players with equal ratings
        let rows = sqlx::query_as::<_, PlayerRow>(&format!(
            r#"
            SELECT {PLAYER_COLUMNS}
            FROM players
            ORDER BY rating DESC, telegram_id ASC
            LIMIT $1
            "#
        ))
        .bind(count)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PlayerRow::into_player).collect())
    }

    async fn insert(&self, player: &NewPlayer) -> GameResult<Player> {
        let row = sqlx::query_as::<_, PlayerRow>(&format!(
            r#"
            INSERT INTO players (telegram_id, player_name, referrer_id)
            VALUES ($1, $2, $3)
            RETURNING {PLAYER_COLUMNS}
            "#
        ))
        .bind(player.telegram_id)
        .bind(&player.name)
        .bind(player.referrer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                GameError::DuplicateTelegramId(player.telegram_id)
            }
            _ => GameError::Database(e),
        })?;

        tracing::info!(telegram_id = player.telegram_id, "Player created");

        Ok(row.into_player())
    }

    async fn update(&self, id: PlayerId, update: &PlayerUpdate) -> GameResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE players
            SET player_name = $2, rating = $3
            WHERE player_id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(&update.name)
        .bind(update.rating)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(GameError::PlayerNotFound);
        }
        Ok(())
    }

    async fn adjust_rating(&self, telegram_id: i64, delta: f64) -> GameResult<bool> {
        // Single-statement read-modify-write: atomic at the store level,
        // concurrent adjustments never lose updates
        let updated = sqlx::query(
            r#"
            UPDATE players
            SET rating = rating + $2
            WHERE telegram_id = $1
            "#,
        )
        .bind(telegram_id)
        .bind(delta)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete(&self, id: PlayerId) -> GameResult<()> {
        sqlx::query("DELETE FROM players WHERE player_id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn referrals(&self, telegram_id: i64) -> GameResult<Vec<Player>> {
        let rows = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players WHERE referrer_id = $1 ORDER BY player_id"
        ))
        .bind(telegram_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PlayerRow::into_player).collect())
    }

    async fn referrer(&self, telegram_id: i64) -> GameResult<Option<Player>> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r#"
            SELECT
                r.player_id,
                r.telegram_id,
                r.player_name,
                r.rating,
                r.region_id,
                r.referrer_id,
                r.created_at
            FROM players p
            JOIN players r ON r.telegram_id = p.referrer_id
            WHERE p.telegram_id = $1
            "#,
        )
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PlayerRow::into_player))
    }

    async fn assign_region(&self, player_id: PlayerId, region_id: RegionId) -> GameResult<bool> {
        // The EXISTS guard makes "unknown region" a negative result
        // instead of a foreign key error
        let updated = sqlx::query(
            r#"
            UPDATE players
            SET region_id = $2
            WHERE player_id = $1
              AND EXISTS (SELECT 1 FROM regions WHERE region_id = $2)
            "#,
        )
        .bind(player_id.as_i64())
        .bind(region_id.as_i64())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn region_ip(&self, player_id: PlayerId) -> GameResult<Option<String>> {
        let ip: Option<String> = sqlx::query_scalar(
            r#"
            SELECT rg.region_ip
            FROM players p
            JOIN regions rg ON rg.region_id = p.region_id
            WHERE p.player_id = $1
            "#,
        )
        .bind(player_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(ip)
    }
}

// ============================================================================
// Row mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct PlayerRow {
    player_id: i64,
    telegram_id: i64,
    player_name: String,
    rating: f64,
    region_id: Option<i64>,
    referrer_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl PlayerRow {
    fn into_player(self) -> Player {
        Player {
            id: PlayerId::from_i64(self.player_id),
            telegram_id: self.telegram_id,
            name: self.player_name,
            rating: self.rating,
            region_id: self.region_id.map(RegionId::from_i64),
            referrer_id: self.referrer_id,
            created_at: self.created_at,
        }
    }
}
