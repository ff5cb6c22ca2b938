#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use fxsignals::application::market_data::{PriceHistorySettings, PriceHistorySource, ProviderCatalog};
use fxsignals::application::signals::{SignalGenerator, SignalPolicy};
use fxsignals::domain::market::CandleResponse;
use fxsignals::domain::ports::CandleProvider;
use fxsignals::infrastructure::SeededRandomSource;
use std::sync::Arc;
use std::time::Duration;

/// Wednesday 2026-10-14 13:07:00 UTC
pub fn wednesday_afternoon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, 13, 7, 0).unwrap()
}

/// Columnar payload where each candle opens at the previous close
pub fn chained_response(closes: &[f64], wick: f64, now: i64) -> CandleResponse {
    let mut response = CandleResponse {
        s: "ok".to_string(),
        ..Default::default()
    };
    let n = closes.len() as i64;
    let mut prev = closes[0];
    for (i, &close) in closes.iter().enumerate() {
        let open = prev;
        response.o.push(open);
        response.c.push(close);
        response.h.push(open.max(close) + wick);
        response.l.push(open.min(close) - wick);
        response.v.push(500.0);
        response.t.push(now - (n - i as i64) * 300);
        prev = close;
    }
    response
}

/// 48 rising candles, an 11-candle pullback, then a bullish engulfing candle on volume
pub fn pullback_response(now: i64) -> CandleResponse {
    let mut closes: Vec<f64> = (0..48).map(|i| 1.08 + 0.001 * i as f64).collect();
    let mut last = closes[47];
    for _ in 0..11 {
        last -= 0.0006;
        closes.push(last);
    }
    let mut response = chained_response(&closes, 0.0002, now);

    let prev_open = *response.o.last().unwrap();
    let prev_close = *response.c.last().unwrap();
    let open = prev_close - 0.0001;
    let close = prev_open + 0.0001;
    response.o.push(open);
    response.c.push(close);
    response.h.push(close + 0.0002);
    response.l.push(open - 0.0002);
    response.v.push(1200.0);
    response.t.push(now);
    response
}

/// 60 strictly increasing closes starting at `start`
pub fn rising_response(start: f64, step: f64, now: i64) -> CandleResponse {
    let closes: Vec<f64> = (0..60).map(|i| start + step * i as f64).collect();
    chained_response(&closes, 0.0002, now)
}

pub fn generator(provider: Arc<dyn CandleProvider>, synthetic_fallback: bool) -> SignalGenerator {
    let random = Arc::new(SeededRandomSource::new(42));
    let source = PriceHistorySource::new(
        provider,
        ProviderCatalog::default(),
        random.clone(),
        PriceHistorySettings {
            attempt_timeout: Duration::from_millis(200),
            synthetic_fallback,
            ..Default::default()
        },
    );
    SignalGenerator::new(source, SignalPolicy::default(), random)
}
