//! Telegram Router

use std::sync::Arc;

use axum::{Router, routing::post};

use crate::config::BotConfig;
use crate::presentation::handlers;

/// Create the Telegram verification router
pub fn telegram_router(config: BotConfig) -> Router {
    Router::new()
        .route("/verify", post(handlers::verify))
        .with_state(Arc::new(config))
}
