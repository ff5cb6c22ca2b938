use crate::application::signals::SignalGenerator;
use crate::domain::ports::Notifier;
use crate::domain::repositories::{SettingsRepository, SignalRepository, StoredSignal};
use crate::domain::signal::window::WINDOW_MINUTES;
use anyhow::{Context, Result};
use chrono::{DateTime, Timelike, Utc};
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

pub const DEFAULT_TICK: Duration = Duration::from_secs(60);

/// Periodic trigger for auto mode.
///
/// Every tick checks the clock; on minutes divisible by 5 (and with auto mode
/// enabled in settings) it generates for all active pairs concurrently,
/// notifies when enabled, and persists each signal.
pub struct AutoModeScheduler {
    generator: Arc<SignalGenerator>,
    signals: Arc<dyn SignalRepository>,
    settings: Arc<dyn SettingsRepository>,
    notifier: Arc<dyn Notifier>,
    tick: Duration,
    /// Last M5 slot already generated, so a slot never fires twice
    last_slot: AtomicI64,
}

impl AutoModeScheduler {
    pub fn new(
        generator: Arc<SignalGenerator>,
        signals: Arc<dyn SignalRepository>,
        settings: Arc<dyn SettingsRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            generator,
            signals,
            settings,
            notifier,
            tick: DEFAULT_TICK,
            last_slot: AtomicI64::new(i64::MIN),
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn is_generation_minute(now: DateTime<Utc>) -> bool {
        i64::from(now.minute()) % WINDOW_MINUTES == 0
    }

    /// One scheduler tick at `now`. Returns the signals stored by this tick.
    pub async fn tick_at(&self, now: DateTime<Utc>) -> Result<Vec<StoredSignal>> {
        if !Self::is_generation_minute(now) {
            return Ok(Vec::new());
        }

        let settings = self
            .settings
            .get()
            .await
            .context("Failed to load settings")?;
        if !settings.is_auto_mode {
            debug!("AutoModeScheduler: auto mode disabled, skipping tick");
            return Ok(Vec::new());
        }

        let slot = now.timestamp().div_euclid(WINDOW_MINUTES * 60);
        if self.last_slot.swap(slot, Ordering::SeqCst) == slot {
            debug!("AutoModeScheduler: slot {} already generated", slot);
            return Ok(Vec::new());
        }

        info!(
            "AutoModeScheduler: generating for {} pairs",
            settings.active_pairs.len()
        );
        let signals = join_all(
            settings
                .active_pairs
                .iter()
                .map(|pair| self.generator.generate_at(pair, false, now)),
        )
        .await;

        let notify = settings.telegram_enabled && self.notifier.is_configured();
        let mut stored = Vec::with_capacity(signals.len());
        for mut signal in signals {
            if notify {
                match self.notifier.notify(&signal.notification_text()).await {
                    Ok(()) => signal.sent_flag = true,
                    Err(e) => warn!("AutoModeScheduler [{}]: notification failed: {:#}", signal.pair, e),
                }
            }
            let record = self
                .signals
                .save(signal)
                .await
                .context("Failed to persist generated signal")?;
            stored.push(record);
        }

        Ok(stored)
    }

    /// Tick until `shutdown` resolves
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!("AutoModeScheduler: started (tick {:?})", self.tick);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.tick_at(Utc::now()).await {
                        error!("AutoModeScheduler: tick failed: {:#}", e);
                    }
                }
                _ = &mut shutdown => {
                    info!("AutoModeScheduler: shutting down");
                    break;
                }
            }
        }
    }
}
