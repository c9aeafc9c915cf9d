//! Telegram Mini App Backend Module
//!
//! Clean Architecture structure:
//! - `init_data` - Parsing of the `window.Telegram.WebApp.initData` payload
//! - `verify` - HMAC-SHA256 authenticity check against the bot token
//! - `config` - Bot credentials loaded from the environment
//! - `presentation/` - HTTP handlers
//!
//! ## Security Model
//! - The bot token is the only secret; it never leaves the backend
//! - Verification follows the documented two-stage HMAC derivation:
//!   `secret = HMAC(key = bot_token, msg = "WebAppData")`, then the
//!   payload hash is `HMAC(key = secret, msg = data_check_string)`
//! - Hash comparison is constant time
//! - The verifier answers valid/invalid only; it never explains which
//!   part of a payload failed

pub mod config;
pub mod init_data;
pub mod presentation;
pub mod verify;

// Re-exports for convenience
pub use config::{BotConfig, ConfigError};
pub use init_data::InitData;
pub use presentation::router::telegram_router;
pub use verify::verify_init_data;
