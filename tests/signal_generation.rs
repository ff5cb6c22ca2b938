mod support;

use fxsignals::domain::market::{CandleSeries, CurrencyPair, MarketSession, SeriesOrigin};
use fxsignals::domain::signal::{Action, AdvisoryOpinion, Signal, SignalTier};
use fxsignals::infrastructure::mock::{MockAdvisoryService, MockCandleProvider, ScriptedResponse};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use support::{generator, pullback_response, rising_response, wednesday_afternoon};

fn assert_levels_ordered(signal: &Signal) {
    match signal.action {
        Action::Buy => {
            assert!(signal.stop_loss < signal.entry_price);
            assert!(signal.entry_price < signal.take_profit);
        }
        Action::Sell => {
            assert!(signal.take_profit < signal.entry_price);
            assert!(signal.entry_price < signal.stop_loss);
        }
    }
}

#[tokio::test]
async fn test_pullback_in_uptrend_is_elite_buy() {
    let now = wednesday_afternoon();
    let provider = Arc::new(MockCandleProvider::serving(pullback_response(now.timestamp())));
    let generator = generator(provider.clone(), true);

    let signal = generator
        .generate_at(&CurrencyPair::new("EUR/USD"), true, now)
        .await;

    assert_eq!(signal.action, Action::Buy);
    assert_eq!(signal.tier, SignalTier::Elite);
    assert_eq!(signal.confidence, 94);
    assert_eq!(signal.entry_price, dec!(1.12110));
    assert_levels_ordered(&signal);
    assert_eq!(signal.session, MarketSession::London);
    assert!(signal.is_manual);
    assert!(!signal.sent_flag);
    assert!(signal.reasoning.contains("score +9.00"));
    assert!(signal.reasoning.contains("window 16:10 EAT - 16:15 EAT"));
    // First venue answered
    assert_eq!(provider.calls(), vec!["FX_IDC:EURUSD".to_string()]);
}

#[tokio::test]
async fn test_strict_uptrend_is_dampened_buy() {
    let now = wednesday_afternoon();
    let provider = Arc::new(MockCandleProvider::serving(rising_response(
        1.08,
        0.001,
        now.timestamp(),
    )));
    let generator = generator(provider, true);

    let signal = generator
        .generate_at(&CurrencyPair::new("EUR/USD"), false, now)
        .await;

    assert_eq!(signal.action, Action::Buy);
    assert_eq!(signal.tier, SignalTier::Standard);
    assert!(signal.confidence > 0);
    assert!(signal.confidence < generator.policy().tiers.elite_confidence);
    assert!(signal.reasoning.contains("safety: overbought"));
    assert_levels_ordered(&signal);
}

#[tokio::test]
async fn test_prices_use_pair_precision() {
    let now = wednesday_afternoon();
    let provider = Arc::new(MockCandleProvider::serving(rising_response(
        150.0,
        0.1,
        now.timestamp(),
    )));
    let jpy = generator(provider, true)
        .generate_at(&CurrencyPair::new("USD/JPY"), false, now)
        .await;

    assert_eq!(jpy.entry_price, dec!(155.900));
    for price in [jpy.entry_price, jpy.stop_loss, jpy.take_profit] {
        assert_eq!(price.scale(), 3);
    }

    let provider = Arc::new(MockCandleProvider::serving(pullback_response(now.timestamp())));
    let eur = generator(provider, true)
        .generate_at(&CurrencyPair::new("EUR/USD"), false, now)
        .await;
    for price in [eur.entry_price, eur.stop_loss, eur.take_profit] {
        assert_eq!(price.scale(), 5);
    }
}

#[tokio::test]
async fn test_later_venue_is_used_when_earlier_ones_fail() {
    let now = wednesday_afternoon();
    let provider = Arc::new(MockCandleProvider::failing(503));
    provider.script(
        "OANDA:EUR_USD",
        ScriptedResponse::Ok(pullback_response(now.timestamp())),
    );
    let generator = generator(provider.clone(), true);

    let signal = generator
        .generate_at(&CurrencyPair::new("EUR/USD"), false, now)
        .await;

    assert_eq!(signal.tier, SignalTier::Elite);
    assert_eq!(
        provider.calls(),
        vec!["FX_IDC:EURUSD", "FOREXCOM:EUR_USD", "OANDA:EUR_USD"]
    );
}

#[tokio::test]
async fn test_all_providers_failing_uses_synthetic_history() {
    let now = wednesday_afternoon();
    let provider = Arc::new(MockCandleProvider::failing(500));
    let generator = generator(provider.clone(), true);

    let signal = generator
        .generate_at(&CurrencyPair::new("GBP/USD"), false, now)
        .await;

    assert_eq!(provider.calls().len(), 5);
    assert_ne!(signal.tier, SignalTier::Fallback);
    assert!(signal.confidence <= 55);
    assert!(signal.reasoning.contains("synthetic data"));
    assert_eq!(signal.entry_price.scale(), 5);
    assert_levels_ordered(&signal);
}

#[tokio::test]
async fn test_exhaustion_without_synthetic_history_returns_fallback() {
    let now = wednesday_afternoon();
    let provider = Arc::new(MockCandleProvider::with_default(ScriptedResponse::NetworkError(
        "connection refused".to_string(),
    )));
    let generator = generator(provider, false);

    let signal = generator
        .generate_at(&CurrencyPair::new("USD/JPY"), true, now)
        .await;

    assert_eq!(signal.tier, SignalTier::Fallback);
    assert_eq!(signal.confidence, 60);
    assert_eq!(signal.entry_price, dec!(145.230));
    assert!(signal.is_manual);
    assert_levels_ordered(&signal);
}

#[tokio::test]
async fn test_same_series_gives_same_signal() {
    let now = wednesday_afternoon();
    let generator = generator(Arc::new(MockCandleProvider::new()), true);
    let series = CandleSeries::new(
        CurrencyPair::new("EUR/USD"),
        pullback_response(now.timestamp()).into_candles(),
        SeriesOrigin::Provider("OANDA:EUR_USD".to_string()),
    );

    let first = generator.signal_from_series(&series, false, now).await.unwrap();
    let second = generator.signal_from_series(&series, false, now).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_concurrent_generation_does_not_interfere() {
    let now = wednesday_afternoon();
    let provider = Arc::new(MockCandleProvider::serving(pullback_response(now.timestamp())));
    let generator = generator(provider, true);
    let pair = CurrencyPair::new("EUR/USD");

    let (a, b) = tokio::join!(
        generator.generate_at(&pair, false, now),
        generator.generate_at(&pair, false, now)
    );

    assert_eq!(a, b);
}

#[tokio::test]
async fn test_unusable_advisory_is_a_no_op() {
    let now = wednesday_afternoon();
    let pair = CurrencyPair::new("EUR/USD");
    let response = pullback_response(now.timestamp());

    let baseline = generator(Arc::new(MockCandleProvider::serving(response.clone())), true)
        .generate_at(&pair, false, now)
        .await;

    let services = [
        Arc::new(MockAdvisoryService::unconfigured()),
        Arc::new(MockAdvisoryService::absent()),
        Arc::new(MockAdvisoryService::failing()),
        Arc::new(MockAdvisoryService::slow(Duration::from_secs(5))),
    ];
    for service in services {
        let generator = generator(Arc::new(MockCandleProvider::serving(response.clone())), true)
            .with_advisory(service.clone(), Duration::from_millis(50));

        let signal = generator.generate_at(&pair, false, now).await;
        assert_eq!(signal, baseline);
    }
}

#[tokio::test]
async fn test_unconfigured_advisory_is_never_called() {
    let now = wednesday_afternoon();
    let service = Arc::new(MockAdvisoryService::unconfigured());
    let generator = generator(
        Arc::new(MockCandleProvider::serving(pullback_response(now.timestamp()))),
        true,
    )
    .with_advisory(service.clone(), Duration::from_millis(50));

    generator
        .generate_at(&CurrencyPair::new("EUR/USD"), false, now)
        .await;

    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn test_advisory_opinion_shifts_score() {
    let now = wednesday_afternoon();
    let pair = CurrencyPair::new("EUR/USD");
    let response = pullback_response(now.timestamp());

    let agreeing = Arc::new(MockAdvisoryService::returning(AdvisoryOpinion {
        action: Action::Buy,
        confidence: 80,
        reasoning: "higher lows".to_string(),
    }));
    let signal = generator(Arc::new(MockCandleProvider::serving(response.clone())), true)
        .with_advisory(agreeing.clone(), Duration::from_secs(1))
        .generate_at(&pair, false, now)
        .await;

    assert_eq!(agreeing.calls(), 1);
    assert_eq!(signal.action, Action::Buy);
    assert!(signal.reasoning.contains("score +19.00"));
    assert!(signal.reasoning.contains("advisory +10.00"));

    let opposing = Arc::new(MockAdvisoryService::returning(AdvisoryOpinion {
        action: Action::Sell,
        confidence: 80,
        reasoning: "rejection at resistance".to_string(),
    }));
    let signal = generator(Arc::new(MockCandleProvider::serving(response)), true)
        .with_advisory(opposing, Duration::from_secs(1))
        .generate_at(&pair, false, now)
        .await;

    // Net score turns bearish, then counter-trend and oversold dampen it
    assert_eq!(signal.action, Action::Sell);
    assert_eq!(signal.tier, SignalTier::Standard);
    assert!(signal.reasoning.contains("safety: counter-trend, oversold"));
    assert!(signal.confidence < 10);
}

#[tokio::test]
async fn test_exhausted_source_serves_fifty_synthetic_points() {
    use fxsignals::application::market_data::{PriceHistorySettings, PriceHistorySource, ProviderCatalog};
    use fxsignals::infrastructure::SeededRandomSource;

    let now = wednesday_afternoon().timestamp();
    let pair = CurrencyPair::new("EUR/USD");
    let source = PriceHistorySource::new(
        Arc::new(MockCandleProvider::failing(502)),
        ProviderCatalog::default(),
        Arc::new(SeededRandomSource::new(9)),
        PriceHistorySettings::default(),
    );

    let payload = source.synthetic_payload(&pair, now);
    assert_eq!(payload.s, "ok");
    assert_eq!(payload.len(), 50);

    let series = source.fetch_at(&pair, now).await.unwrap();
    assert_eq!(series.origin, SeriesOrigin::Synthetic);
    assert_eq!(series.candles.len(), 50);
    assert_eq!(series.candles, payload.into_candles());
}

#[tokio::test]
async fn test_ragged_first_venue_does_not_stop_the_chain() {
    let now = wednesday_afternoon();
    let mut ragged = pullback_response(now.timestamp());
    ragged.o.clear();
    ragged.h.clear();
    ragged.l.clear();

    let provider = Arc::new(MockCandleProvider::new());
    provider.script("FX_IDC:EURUSD", ScriptedResponse::Ok(ragged));
    provider.script(
        "FOREXCOM:EUR_USD",
        ScriptedResponse::Ok(pullback_response(now.timestamp())),
    );
    let generator = generator(provider.clone(), true);

    let signal = generator
        .generate_at(&CurrencyPair::new("EUR/USD"), false, now)
        .await;

    assert_ne!(signal.tier, SignalTier::Fallback);
    assert_eq!(signal.action, Action::Buy);
    assert_eq!(provider.calls(), vec!["FX_IDC:EURUSD", "FOREXCOM:EUR_USD"]);
}
