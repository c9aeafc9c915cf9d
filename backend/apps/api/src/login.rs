//! Service Login
//!
//! A single trusted backend account exchanges its credentials for a
//! signed bearer token accepted by the privileged player routes.

use std::env;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use platform::crypto::constant_time_eq;
use serde::{Deserialize, Serialize};

const DEFAULT_TOKEN_TTL_MS: i64 = 3_600_000;

/// Credentials and signing material for the login endpoint
#[derive(Clone)]
pub struct LoginConfig {
    username: String,
    password: String,
    token_ttl_ms: i64,
    token_secret: [u8; 32],
}

impl LoginConfig {
    /// Load the service account from `SERVICE_USERNAME` and
    /// `SERVICE_PASSWORD`. Both are required; there is no default
    /// account.
    pub fn from_env(token_secret: [u8; 32]) -> anyhow::Result<Self> {
        let username = env::var("SERVICE_USERNAME").context("SERVICE_USERNAME must be set")?;
        let password = env::var("SERVICE_PASSWORD").context("SERVICE_PASSWORD must be set")?;
        anyhow::ensure!(!password.is_empty(), "SERVICE_PASSWORD must not be empty");

        let token_ttl_ms = env::var("SERVICE_TOKEN_TTL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_MS);

        Ok(Self {
            username,
            password,
            token_ttl_ms,
            token_secret,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
}

/// POST /api/login
async fn login(
    State(config): State<Arc<LoginConfig>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    // Both comparisons run unconditionally and in constant time so the
    // response latency does not reveal which field was wrong
    let username_ok = constant_time_eq(req.username.as_bytes(), config.username.as_bytes());
    let password_ok = constant_time_eq(req.password.as_bytes(), config.password.as_bytes());

    if !(username_ok && password_ok) {
        tracing::debug!("Rejected login attempt");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let token = platform::token::issue(&config.username, config.token_ttl_ms, &config.token_secret);
    Json(LoginResponse { token }).into_response()
}

/// Create the login router
pub fn login_router(config: LoginConfig) -> Router {
    Router::new()
        .route("/login", post(login))
        .with_state(Arc::new(config))
}
