//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

/// Verification request carrying the raw init data string
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub init_data: String,
}

/// Verification response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub valid: bool,
}
