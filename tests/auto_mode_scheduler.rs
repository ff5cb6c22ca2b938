mod support;

use chrono::{TimeZone, Utc};
use fxsignals::application::scheduler::AutoModeScheduler;
use fxsignals::domain::market::CurrencyPair;
use fxsignals::domain::ports::Notifier;
use fxsignals::domain::repositories::{
    SettingsRepository, SettingsUpdate, SignalFilter, SignalRepository, Settings,
};
use fxsignals::infrastructure::mock::{MockCandleProvider, MockNotifier};
use fxsignals::infrastructure::{InMemorySettingsRepository, InMemorySignalRepository};
use std::sync::Arc;
use support::{generator, pullback_response};

struct Harness {
    scheduler: AutoModeScheduler,
    signals: Arc<InMemorySignalRepository>,
    settings: Arc<InMemorySettingsRepository>,
    notifier: Arc<MockNotifier>,
}

fn harness(settings: Settings, notifier: MockNotifier) -> Harness {
    let now = Utc.with_ymd_and_hms(2026, 10, 14, 13, 10, 0).unwrap();
    let provider = Arc::new(MockCandleProvider::serving(pullback_response(now.timestamp())));
    let generator = Arc::new(generator(provider, true));
    let signals = Arc::new(InMemorySignalRepository::new());
    let settings = Arc::new(InMemorySettingsRepository::new(settings));
    let notifier = Arc::new(notifier);

    let notifier_port: Arc<dyn Notifier> = notifier.clone();
    let scheduler = AutoModeScheduler::new(
        generator,
        signals.clone(),
        settings.clone(),
        notifier_port,
    );

    Harness {
        scheduler,
        signals,
        settings,
        notifier,
    }
}

fn auto_settings(telegram_enabled: bool) -> Settings {
    Settings {
        is_auto_mode: true,
        telegram_enabled,
        active_pairs: vec![CurrencyPair::new("EUR/USD"), CurrencyPair::new("USD/JPY")],
        telegram_chat_id: Some("12345".to_string()),
    }
}

#[tokio::test]
async fn test_only_five_minute_boundaries_generate() {
    let h = harness(auto_settings(false), MockNotifier::new());

    let off_boundary = Utc.with_ymd_and_hms(2026, 10, 14, 13, 7, 0).unwrap();
    assert!(!AutoModeScheduler::is_generation_minute(off_boundary));
    assert!(h.scheduler.tick_at(off_boundary).await.unwrap().is_empty());
    assert_eq!(h.signals.count().await, 0);
}

#[tokio::test]
async fn test_disabled_auto_mode_generates_nothing() {
    let h = harness(Settings::default(), MockNotifier::new());

    let boundary = Utc.with_ymd_and_hms(2026, 10, 14, 13, 10, 0).unwrap();
    assert!(h.scheduler.tick_at(boundary).await.unwrap().is_empty());
    assert_eq!(h.signals.count().await, 0);
}

#[tokio::test]
async fn test_boundary_generates_for_every_active_pair() {
    let h = harness(auto_settings(false), MockNotifier::new());

    let boundary = Utc.with_ymd_and_hms(2026, 10, 14, 13, 10, 0).unwrap();
    let stored = h.scheduler.tick_at(boundary).await.unwrap();

    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|s| !s.signal.is_manual && !s.signal.sent_flag));
    assert!(h.notifier.messages().is_empty());

    let listed = h.signals.list(&SignalFilter::for_pair("USD/JPY"), 10).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].signal.pair, CurrencyPair::new("USD/JPY"));
}

#[tokio::test]
async fn test_notification_sets_sent_flag() {
    let h = harness(auto_settings(true), MockNotifier::new());

    let boundary = Utc.with_ymd_and_hms(2026, 10, 14, 13, 15, 0).unwrap();
    let stored = h.scheduler.tick_at(boundary).await.unwrap();

    assert_eq!(h.notifier.messages().len(), 2);
    assert!(h.notifier.messages()[0].contains("Entry:"));
    assert!(stored.iter().all(|s| s.signal.sent_flag));
}

#[tokio::test]
async fn test_failed_notification_still_persists() {
    let h = harness(auto_settings(true), MockNotifier::failing());

    let boundary = Utc.with_ymd_and_hms(2026, 10, 14, 13, 20, 0).unwrap();
    let stored = h.scheduler.tick_at(boundary).await.unwrap();

    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|s| !s.signal.sent_flag));
    assert_eq!(h.signals.count().await, 2);
}

#[tokio::test]
async fn test_slot_fires_once() {
    let h = harness(auto_settings(false), MockNotifier::new());

    let first = Utc.with_ymd_and_hms(2026, 10, 14, 13, 10, 0).unwrap();
    let same_minute = Utc.with_ymd_and_hms(2026, 10, 14, 13, 10, 40).unwrap();
    let next_slot = Utc.with_ymd_and_hms(2026, 10, 14, 13, 15, 0).unwrap();

    assert_eq!(h.scheduler.tick_at(first).await.unwrap().len(), 2);
    assert!(h.scheduler.tick_at(same_minute).await.unwrap().is_empty());
    assert_eq!(h.scheduler.tick_at(next_slot).await.unwrap().len(), 2);
    assert_eq!(h.signals.count().await, 4);
}

#[tokio::test]
async fn test_settings_changes_apply_on_next_tick() {
    let h = harness(auto_settings(false), MockNotifier::new());

    h.settings
        .update(SettingsUpdate {
            active_pairs: Some(vec![CurrencyPair::new("GBP/USD")]),
            ..Default::default()
        })
        .await
        .unwrap();

    let boundary = Utc.with_ymd_and_hms(2026, 10, 14, 13, 10, 0).unwrap();
    let stored = h.scheduler.tick_at(boundary).await.unwrap();

    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].signal.pair, CurrencyPair::new("GBP/USD"));
}
