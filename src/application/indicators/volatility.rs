//! Volatility indicators: ATR and Bollinger Bands.

use crate::domain::market::Candle;
use crate::domain::signal::BollingerValue;

/// Floor for ATR so stop distances downstream are never zero-width
pub const MIN_ATR: f64 = 0.0001;

/// Average True Range over the trailing `period` candles.
///
/// Each true range needs the previous close, so `period + 1` candles are
/// required. Short series and degenerate (flat) windows return [`MIN_ATR`].
pub fn atr(candles: &[Candle], period: usize) -> f64 {
    if period == 0 || candles.len() < period + 1 {
        return MIN_ATR;
    }

    let start = candles.len() - period;
    let total: f64 = (start..candles.len())
        .map(|i| candles[i].true_range(candles[i - 1].close))
        .sum();
    let value = total / period as f64;

    if value.is_finite() && value > 0.0 {
        value
    } else {
        MIN_ATR
    }
}

/// Bollinger Bands: SMA of the last `period` prices +/- `std_dev_multiplier`
/// population standard deviations.
///
/// With fewer than `period` prices all three bands collapse onto the last
/// price (zero width), which disables band-touch conditions downstream.
pub fn bollinger_bands(prices: &[f64], period: usize, std_dev_multiplier: f64) -> BollingerValue {
    let Some(&last) = prices.last() else {
        return BollingerValue::default();
    };
    if period == 0 || prices.len() < period {
        return BollingerValue {
            upper: last,
            middle: last,
            lower: last,
        };
    }

    let window = &prices[prices.len() - period..];
    let n = period as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
    let band = variance.sqrt() * std_dev_multiplier;

    BollingerValue {
        upper: mean + band,
        middle: mean,
        lower: mean - band,
    }
}
