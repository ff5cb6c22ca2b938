//! Auto-mode scheduler configuration parsing from environment variables.

use super::provider_config::parse_list;
use crate::domain::market::CurrencyPair;
use crate::domain::repositories::Settings;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SchedulerEnvConfig {
    pub auto_mode: bool,
    pub telegram_enabled: bool,
    pub active_pairs: Vec<CurrencyPair>,
    pub tick_secs: u64,
}

impl Default for SchedulerEnvConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            auto_mode: settings.is_auto_mode,
            telegram_enabled: settings.telegram_enabled,
            active_pairs: settings.active_pairs,
            tick_secs: 60,
        }
    }
}

impl SchedulerEnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auto_mode: env::var("AUTO_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<bool>()
                .unwrap_or(false),
            telegram_enabled: env::var("TELEGRAM_ENABLED")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<bool>()
                .unwrap_or(false),
            active_pairs: env::var("ACTIVE_PAIRS")
                .map(|v| parse_list(&v).iter().map(|p| CurrencyPair::new(p)).collect::<Vec<_>>())
                .ok()
                .filter(|pairs| !pairs.is_empty())
                .unwrap_or(defaults.active_pairs),
            tick_secs: env::var("TICK_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.tick_secs),
        }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_secs)
    }

    /// Initial settings record for the settings repository
    pub fn initial_settings(&self, telegram_chat_id: Option<String>) -> Settings {
        Settings {
            is_auto_mode: self.auto_mode,
            telegram_enabled: self.telegram_enabled,
            active_pairs: self.active_pairs.clone(),
            telegram_chat_id,
        }
    }
}
