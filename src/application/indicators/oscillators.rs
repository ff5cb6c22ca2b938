//! Momentum oscillators: RSI, MACD and Stochastic %K.

use super::moving_average::ema;
use crate::domain::market::Candle;
use crate::domain::signal::MacdValue;

pub const RSI_NEUTRAL: f64 = 50.0;
pub const STOCHASTIC_NEUTRAL: f64 = 50.0;

const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
/// Weight of the current MACD value in the approximated signal line
const MACD_SIGNAL_CURRENT_WEIGHT: f64 = 0.2;

/// Relative Strength Index over the trailing `period` price changes,
/// using simple averages of gains and losses.
///
/// # Returns
/// * `50.0` if there are fewer than `period + 1` prices
/// * `100.0` if the window has no losses
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return RSI_NEUTRAL;
    }

    let window = &prices[prices.len() - (period + 1)..];
    let (gains, losses) = window
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0, 0.0), |(gains, losses), change| {
            if change > 0.0 {
                (gains + change, losses)
            } else {
                (gains, losses - change)
            }
        });

    if losses == 0.0 {
        return 100.0;
    }

    let rs = (gains / period as f64) / (losses / period as f64);
    100.0 - 100.0 / (1.0 + rs)
}

fn macd_line(prices: &[f64]) -> f64 {
    ema(prices, MACD_FAST) - ema(prices, MACD_SLOW)
}

/// MACD line as `EMA(12) - EMA(26)`.
///
/// No MACD history is carried between calls, so the signal line is
/// approximated as `0.2 * current + 0.8 * previous`, where `previous` is the
/// MACD line recomputed without the last price.
pub fn macd(prices: &[f64]) -> MacdValue {
    if prices.is_empty() {
        return MacdValue::default();
    }

    let line = macd_line(prices);
    let previous = if prices.len() >= 2 {
        macd_line(&prices[..prices.len() - 1])
    } else {
        line
    };
    let signal = MACD_SIGNAL_CURRENT_WEIGHT * line + (1.0 - MACD_SIGNAL_CURRENT_WEIGHT) * previous;

    MacdValue {
        line,
        signal,
        histogram: line - signal,
    }
}

/// Stochastic %K: `(close - lowest low) / (highest high - lowest low) * 100`
/// over the last `period` candles.
///
/// Returns `50.0` for short series or a zero-width range.
pub fn stochastic_k(candles: &[Candle], period: usize) -> f64 {
    if period == 0 || candles.len() < period {
        return STOCHASTIC_NEUTRAL;
    }

    let window = &candles[candles.len() - period..];
    let highest = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let lowest = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let range = highest - lowest;
    if range <= 0.0 {
        return STOCHASTIC_NEUTRAL;
    }

    let close = window[window.len() - 1].close;
    (close - lowest) / range * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            open,
            high,
            low,
            close,
            volume: 100.0,
            timestamp: 0,
        }
    }

    #[test]
    fn test_rsi_short_series_is_neutral() {
        let prices = vec![1.0, 1.1, 1.2, 1.1, 1.3];
        assert_eq!(rsi(&prices, 14), 50.0);
    }

    #[test]
    fn test_rsi_no_losses_is_100() {
        let prices: Vec<f64> = (0..20).map(|i| 1.0 + i as f64 * 0.01).collect();
        assert_eq!(rsi(&prices, 14), 100.0);
    }

    #[test]
    fn test_rsi_balanced_moves() {
        // Alternating +1/-1: equal gains and losses -> 50
        let prices: Vec<f64> = (0..15).map(|i| if i % 2 == 0 { 10.0 } else { 11.0 }).collect();
        assert!((rsi(&prices, 14) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_falling_series_is_low() {
        let prices: Vec<f64> = (0..20).map(|i| 2.0 - i as f64 * 0.01).collect();
        assert!(rsi(&prices, 14) < 1.0);
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let prices: Vec<f64> = (0..60).map(|i| 1.08 + i as f64 * 0.0005).collect();
        let value = macd(&prices);

        assert!(value.line > 0.0);
        assert!(value.histogram > 0.0, "accelerating MACD should have positive histogram");
        assert!((value.histogram - (value.line - value.signal)).abs() < 1e-15);
    }

    #[test]
    fn test_macd_degenerate_inputs() {
        assert_eq!(macd(&[]), MacdValue::default());
        let single = macd(&[1.0]);
        assert_eq!(single.line, 0.0);
        assert_eq!(single.histogram, 0.0);
    }

    #[test]
    fn test_stochastic_at_top_of_range() {
        let candles: Vec<Candle> = (0..14)
            .map(|i| {
                let base = 1.0 + i as f64 * 0.01;
                candle(base, base + 0.005, base - 0.005, base + 0.005)
            })
            .collect();
        assert!((stochastic_k(&candles, 14) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_stochastic_flat_range_is_neutral() {
        let candles = vec![candle(1.0, 1.0, 1.0, 1.0); 20];
        assert_eq!(stochastic_k(&candles, 14), 50.0);
        assert_eq!(stochastic_k(&candles[..5], 14), 50.0);
    }
}
