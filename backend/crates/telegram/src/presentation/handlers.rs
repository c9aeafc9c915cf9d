//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::config::BotConfig;
use crate::presentation::dto::{VerifyRequest, VerifyResponse};
use crate::verify::verify_init_data;

/// POST /api/verify
///
/// Returns 200 with `{"valid": true}` for an authentic payload and 400
/// with `{"valid": false}` otherwise. The body never says which check
/// failed.
pub async fn verify(
    State(config): State<Arc<BotConfig>>,
    Json(req): Json<VerifyRequest>,
) -> (StatusCode, Json<VerifyResponse>) {
    let valid = verify_init_data(&req.init_data, config.bot_token());

    if valid {
        (StatusCode::OK, Json(VerifyResponse { valid: true }))
    } else {
        tracing::debug!("Rejected init data payload");
        (StatusCode::BAD_REQUEST, Json(VerifyResponse { valid: false }))
    }
}
