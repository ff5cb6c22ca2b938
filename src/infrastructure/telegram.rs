//! Notification sinks: Telegram bot and a log-only fallback.

use crate::domain::ports::Notifier;
use crate::infrastructure::core::HttpClientFactory;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

const TELEGRAM_API: &str = "https://api.telegram.org";

pub struct TelegramNotifier {
    bot_token: Option<String>,
    chat_id: Option<String>,
    api_base: String,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: Option<String>, chat_id: Option<String>) -> Self {
        Self {
            bot_token: bot_token.filter(|t| !t.trim().is_empty()),
            chat_id: chat_id.filter(|c| !c.trim().is_empty()),
            api_base: TELEGRAM_API.to_string(),
            client: HttpClientFactory::create_client(Duration::from_secs(10)),
        }
    }

    /// Point at a different Bot API host (self-hosted server, tests)
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }

    /// Skips silently (with a warning) when the bot token or chat id is missing
    async fn notify(&self, text: &str) -> Result<()> {
        let (Some(token), Some(chat_id)) = (self.bot_token.as_deref(), self.chat_id.as_deref()) else {
            warn!("Telegram: bot token or chat id not configured, message skipped");
            return Ok(());
        };

        let response = self
            .client
            .post(format!("{}/bot{}/sendMessage", self.api_base, token))
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "disable_web_page_preview": true,
            }))
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to reach Telegram API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Telegram API returned status {}: {}", status, body);
        }

        info!("Telegram: message sent to {}", chat_id);
        Ok(())
    }
}

/// Writes notifications to the log; used when no chat sink is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn is_configured(&self) -> bool {
        true
    }

    async fn notify(&self, text: &str) -> Result<()> {
        info!("Notification:\n{}", text);
        Ok(())
    }
}
