//! In-Memory Repository Implementations
//!
//! Thread-safe, in-memory implementations of the repository traits defined in
//! `domain::repositories`.
//!
//! # Features
//!
//! - **Thread-safe**: Uses `Arc<RwLock>` for concurrent access
//! - **Async**: All operations are async-ready
//! - **Testing**: Ideal for unit tests and development
//!
//! # Limitations
//!
//! - Data is lost on application restart
//! - Signal history is capped (`DEFAULT_HISTORY_CAPACITY`), oldest first out
//! - No persistence across multiple instances

use crate::domain::repositories::{
    Settings, SettingsRepository, SettingsUpdate, SignalFilter, SignalRepository, StoredSignal,
};
use crate::domain::signal::Signal;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Records kept by `InMemorySignalRepository::new`
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Bounded signal history; the oldest record is evicted once `capacity` is reached
pub struct InMemorySignalRepository {
    signals: Arc<RwLock<VecDeque<StoredSignal>>>,
    capacity: usize,
}

impl InMemorySignalRepository {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            signals: Arc::new(RwLock::new(VecDeque::new())),
            capacity,
        }
    }

    pub async fn count(&self) -> usize {
        self.signals.read().await.len()
    }
}

impl Default for InMemorySignalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalRepository for InMemorySignalRepository {
    async fn save(&self, signal: Signal) -> Result<StoredSignal> {
        let record = StoredSignal {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            signal,
        };
        let mut signals = self.signals.write().await;
        if signals.len() >= self.capacity {
            signals.pop_front();
        }
        signals.push_back(record.clone());
        Ok(record)
    }

    async fn list(&self, filter: &SignalFilter, limit: usize) -> Result<Vec<StoredSignal>> {
        let signals = self.signals.read().await;
        Ok(signals
            .iter()
            .rev()
            .filter(|s| filter.matches(&s.signal))
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Single settings record
pub struct InMemorySettingsRepository {
    settings: Arc<RwLock<Settings>>,
}

impl InMemorySettingsRepository {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }
}

impl Default for InMemorySettingsRepository {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn get(&self) -> Result<Settings> {
        Ok(self.settings.read().await.clone())
    }

    async fn update(&self, update: SettingsUpdate) -> Result<Settings> {
        let mut settings = self.settings.write().await;
        settings.apply(update);
        Ok(settings.clone())
    }
}
