//! Repository Pattern Abstractions
//!
//! Persistence of generated signals and dashboard settings lives outside the
//! signal core. The generator hands a `Signal` back to its caller, and the
//! caller decides whether to store it here.
//!
//! - `SignalRepository`: append-only store of generated signals
//! - `SettingsRepository`: the single settings record (auto mode, pairs, ...)
//!
//! The `InMemory` implementations in `infrastructure::repositories` use
//! `Arc<RwLock>` for concurrent access.
//!
//! # Example
//!
//! ```rust,no_run
//! use fxsignals::domain::repositories::{SignalFilter, SignalRepository};
//! use fxsignals::infrastructure::InMemorySignalRepository;
//!
//! # async {
//! let repo = InMemorySignalRepository::new();
//! let recent = repo.list(&SignalFilter::for_pair("EUR/USD"), 10).await;
//! # };
//! ```

use crate::domain::market::CurrencyPair;
use crate::domain::signal::Signal;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_LIST_LIMIT: usize = 50;

/// A signal as stored by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSignal {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub signal: Signal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalFilter {
    pub pair: Option<CurrencyPair>,
}

impl SignalFilter {
    pub fn for_pair(pair: &str) -> Self {
        Self {
            pair: Some(CurrencyPair::new(pair)),
        }
    }

    pub fn matches(&self, signal: &Signal) -> bool {
        self.pair.as_ref().is_none_or(|pair| &signal.pair == pair)
    }
}

#[async_trait]
pub trait SignalRepository: Send + Sync {
    async fn save(&self, signal: Signal) -> Result<StoredSignal>;

    /// Newest first
    async fn list(&self, filter: &SignalFilter, limit: usize) -> Result<Vec<StoredSignal>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub is_auto_mode: bool,
    pub telegram_enabled: bool,
    pub active_pairs: Vec<CurrencyPair>,
    pub telegram_chat_id: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            is_auto_mode: false,
            telegram_enabled: false,
            active_pairs: ["EUR/USD", "GBP/USD", "USD/JPY"]
                .into_iter()
                .map(CurrencyPair::new)
                .collect(),
            telegram_chat_id: None,
        }
    }
}

/// Partial settings update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub is_auto_mode: Option<bool>,
    pub telegram_enabled: Option<bool>,
    pub active_pairs: Option<Vec<CurrencyPair>>,
    pub telegram_chat_id: Option<String>,
}

impl Settings {
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(auto) = update.is_auto_mode {
            self.is_auto_mode = auto;
        }
        if let Some(enabled) = update.telegram_enabled {
            self.telegram_enabled = enabled;
        }
        if let Some(pairs) = update.active_pairs {
            self.active_pairs = pairs;
        }
        if let Some(chat_id) = update.telegram_chat_id {
            self.telegram_chat_id = Some(chat_id);
        }
    }
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> Result<Settings>;

    async fn update(&self, update: SettingsUpdate) -> Result<Settings>;
}
