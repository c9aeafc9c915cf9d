//! Signed Service Tokens
//!
//! Bearer tokens for the trusted backend client. A token is the
//! base64 encoding of `expires_at_ms (8 bytes BE) || subject || HMAC`,
//! where the HMAC-SHA256 signature covers everything before it. The
//! server is the only party holding the signing secret, so a token
//! cannot be minted or extended by a client.

use chrono::Utc;

use crate::crypto::{constant_time_eq, from_base64, hmac_sha256, to_base64};

const SIGNATURE_LEN: usize = 32;
const EXPIRY_LEN: usize = 8;

/// Issue a signed token for `subject` valid for `ttl_ms` milliseconds.
pub fn issue(subject: &str, ttl_ms: i64, secret: &[u8; 32]) -> String {
    let expires_at_ms = Utc::now().timestamp_millis() + ttl_ms;

    let mut payload = Vec::with_capacity(EXPIRY_LEN + subject.len() + SIGNATURE_LEN);
    payload.extend_from_slice(&expires_at_ms.to_be_bytes());
    payload.extend_from_slice(subject.as_bytes());

    let signature = hmac_sha256(secret, &payload);
    payload.extend_from_slice(&signature);

    to_base64(&payload)
}

/// Verify a token and return its subject if the signature is valid and
/// the token has not expired. Any malformed input yields `None`.
pub fn verify(token: &str, secret: &[u8; 32]) -> Option<String> {
    let data = from_base64(token).ok()?;
    if data.len() < EXPIRY_LEN + SIGNATURE_LEN {
        return None;
    }

    let (payload, provided_signature) = data.split_at(data.len() - SIGNATURE_LEN);
    let expected_signature = hmac_sha256(secret, payload);

    if !constant_time_eq(provided_signature, &expected_signature) {
        return None;
    }

    let expiry_bytes: [u8; EXPIRY_LEN] = payload[..EXPIRY_LEN].try_into().ok()?;
    let expires_at_ms = i64::from_be_bytes(expiry_bytes);
    if Utc::now().timestamp_millis() >= expires_at_ms {
        return None;
    }

    String::from_utf8(payload[EXPIRY_LEN..].to_vec()).ok()
}
