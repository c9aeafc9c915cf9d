//! Game Error Types
//!
//! This module provides game-specific error variants that integrate
//! with the unified `kernel::error::AppError` system, plus the separate
//! cache error type that is absorbed inside the application layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Game-specific result type alias
pub type GameResult<T> = Result<T, GameError>;

/// Game-specific error variants
///
/// These map to appropriate HTTP status codes and convert to `AppError`
/// for unified error handling. Store failures propagate untouched;
/// cache failures never appear here (see [`CacheError`]).
#[derive(Debug, Error)]
pub enum GameError {
    /// Requested player does not exist
    #[error("Player not found")]
    PlayerNotFound,

    /// Telegram id uniqueness constraint violated on create
    #[error("Player with Telegram id {0} already exists")]
    DuplicateTelegramId(i64),

    /// Authoritative store failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GameError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GameError::PlayerNotFound => StatusCode::NOT_FOUND,
            GameError::DuplicateTelegramId(_) => StatusCode::CONFLICT,
            GameError::Database(e) => match e {
                // Store unreachable: surface as unavailable, not a bug
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            GameError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::PlayerNotFound => ErrorKind::NotFound,
            GameError::DuplicateTelegramId(_) => ErrorKind::Conflict,
            GameError::Database(e) => match e {
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => ErrorKind::ServiceUnavailable,
                _ => ErrorKind::InternalServerError,
            },
            GameError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            GameError::Database(e) => {
                tracing::error!(error = %e, "Player store error");
            }
            GameError::Internal(msg) => {
                tracing::error!(message = %msg, "Game internal error");
            }
            // Expected negative results, not incidents
            _ => {
                tracing::debug!(error = %self, "Game error");
            }
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Cache-specific result type alias
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value cache failures.
///
/// Never propagated past the application layer: the services log these
/// at warn level and fall back to the authoritative store.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Cache backend unreachable or returned an error
    #[error("cache backend error: {0}")]
    Backend(String),

    /// Cache operation exceeded its bounded timeout
    #[error("cache operation timed out")]
    Timeout,
}
