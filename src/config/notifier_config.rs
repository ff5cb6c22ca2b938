//! Telegram notifier configuration parsing from environment variables.

use std::env;

#[derive(Debug, Clone, Default)]
pub struct NotifierEnvConfig {
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl NotifierEnvConfig {
    pub fn from_env() -> Self {
        Self {
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").ok().filter(|t| !t.is_empty()),
            telegram_chat_id: env::var("TELEGRAM_CHAT_ID").ok().filter(|c| !c.is_empty()),
        }
    }

    pub fn telegram_configured(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some()
    }
}
