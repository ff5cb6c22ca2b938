//! Price-history provider configuration parsing from environment variables.

use crate::application::market_data::provider_catalog::DEFAULT_VENUES;
use crate::application::market_data::{PriceHistorySettings, ProviderCatalog};
use crate::infrastructure::finnhub::DEFAULT_BASE_URL;
use std::env;
use std::time::Duration;

const MIN_TIMEOUT_SECS: u64 = 1;

#[derive(Debug, Clone)]
pub struct ProviderEnvConfig {
    pub finnhub_api_key: Option<String>,
    pub finnhub_base_url: String,
    pub timeout_secs: u64,
    pub lookback_hours: u64,
    pub venues: Vec<String>,
    pub synthetic_fallback: bool,
}

impl Default for ProviderEnvConfig {
    fn default() -> Self {
        Self {
            finnhub_api_key: None,
            finnhub_base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 5,
            lookback_hours: 4,
            venues: DEFAULT_VENUES.iter().map(|v| v.to_string()).collect(),
            synthetic_fallback: true,
        }
    }
}

impl ProviderEnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            finnhub_api_key: env::var("FINNHUB_API_KEY").ok().filter(|k| !k.is_empty()),
            finnhub_base_url: env::var("FINNHUB_BASE_URL").unwrap_or(defaults.finnhub_base_url),
            timeout_secs: env::var("PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(clamp_timeout_secs)
                .unwrap_or(defaults.timeout_secs),
            lookback_hours: env::var("CANDLE_LOOKBACK_HOURS")
                .unwrap_or_else(|_| "4".to_string())
                .parse::<u64>()
                .unwrap_or(defaults.lookback_hours),
            venues: env::var("PROVIDER_VENUES")
                .map(|v| parse_list(&v))
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.venues),
            synthetic_fallback: env::var("SYNTHETIC_FALLBACK")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(clamp_timeout_secs(self.timeout_secs))
    }

    pub fn catalog(&self) -> ProviderCatalog {
        ProviderCatalog::new(&self.venues)
    }

    pub fn price_history_settings(&self) -> PriceHistorySettings {
        PriceHistorySettings {
            attempt_timeout: self.timeout(),
            lookback: Duration::from_secs(self.lookback_hours * 3600),
            synthetic_fallback: self.synthetic_fallback,
        }
    }
}

/// A zero per-attempt timeout would skip every venue
fn clamp_timeout_secs(secs: u64) -> u64 {
    secs.max(MIN_TIMEOUT_SECS)
}

/// Comma-separated list, trimmed, empty entries dropped
pub(crate) fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
