//! Bot Configuration

use std::fmt;

use thiserror::Error;

/// Configuration errors raised at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TELEGRAM_BOT_TOKEN is unset or empty
    #[error("TELEGRAM_BOT_TOKEN must be set to a non-empty value")]
    MissingBotToken,
}

/// Bot credentials used for init data verification
#[derive(Clone)]
pub struct BotConfig {
    bot_token: String,
}

impl BotConfig {
    pub fn new(bot_token: impl Into<String>) -> Result<Self, ConfigError> {
        let bot_token = bot_token.into();
        if bot_token.is_empty() {
            return Err(ConfigError::MissingBotToken);
        }
        Ok(Self { bot_token })
    }

    /// Load from the `TELEGRAM_BOT_TOKEN` environment variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").map_err(|_| ConfigError::MissingBotToken)?;
        Self::new(bot_token)
    }

    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }
}

// The token is a credential; keep it out of debug output and logs.
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"[redacted]")
            .finish()
    }
}
