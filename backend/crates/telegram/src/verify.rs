//! Init Data Verification
//!
//! Two-stage HMAC-SHA256 derivation as documented by Telegram for Mini
//! Apps. The bot token acts as the root secret.

use platform::crypto::{constant_time_eq, hmac_sha256, to_hex};

use crate::init_data::InitData;

/// Domain-separation constant fixed by the Telegram protocol.
const SECRET_KEY_LABEL: &[u8] = b"WebAppData";

/// Derive the verification secret from the bot token.
///
/// Note the argument roles: the bot token is the HMAC *key* and the
/// constant label is the message, not the other way around.
fn derive_secret(bot_token: &str) -> [u8; 32] {
    hmac_sha256(bot_token.as_bytes(), SECRET_KEY_LABEL)
}

/// Compute the expected hash for a data-check string as lowercase hex.
fn expected_hash(data_check: &str, bot_token: &str) -> String {
    let secret = derive_secret(bot_token);
    to_hex(&hmac_sha256(&secret, data_check.as_bytes()))
}

/// Verify a raw init data payload against the bot token.
///
/// Returns `true` only when the payload carries a `hash` field that
/// matches the HMAC of its remaining fields. The answer is deliberately
/// boolean; callers get no hint about which check failed.
pub fn verify_init_data(raw: &str, bot_token: &str) -> bool {
    let data = InitData::parse(raw);

    let Some(received) = data.received_hash() else {
        return false;
    };

    let expected = expected_hash(&data.data_check_string(), bot_token);
    constant_time_eq(expected.as_bytes(), received.as_bytes())
}
