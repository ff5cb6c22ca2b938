//! Trend strength and market structure.

use crate::domain::market::Candle;

/// Returned when there is not enough history for a directional reading
pub const ADX_NEUTRAL: f64 = 25.0;

/// Candles on each side of a fractal pivot (Williams 5-bar fractal)
const FRACTAL_WING: usize = 2;

/// Simplified ADX: one DX reading over the trailing `period` candles.
///
/// Sums +DM, -DM and true range across the window (no Wilder smoothing),
/// converts to +DI / -DI and returns `100 * |+DI - -DI| / (+DI + -DI)`.
/// Short series return [`ADX_NEUTRAL`]; a window without range or directional
/// movement returns `0.0`.
pub fn adx(candles: &[Candle], period: usize) -> f64 {
    if period == 0 || candles.len() < period + 1 {
        return ADX_NEUTRAL;
    }

    let mut plus_dm = 0.0;
    let mut minus_dm = 0.0;
    let mut tr = 0.0;

    for i in candles.len() - period..candles.len() {
        let curr = &candles[i];
        let prev = &candles[i - 1];

        let up_move = curr.high - prev.high;
        let down_move = prev.low - curr.low;
        if up_move > down_move && up_move > 0.0 {
            plus_dm += up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            minus_dm += down_move;
        }
        tr += curr.true_range(prev.close);
    }

    if tr <= 0.0 {
        return 0.0;
    }

    let plus_di = 100.0 * plus_dm / tr;
    let minus_di = 100.0 * minus_dm / tr;
    let sum_di = plus_di + minus_di;
    if sum_di <= 0.0 {
        return 0.0;
    }

    100.0 * (plus_di - minus_di).abs() / sum_di
}

/// High of the most recent confirmed up-fractal within the last `lookback`
/// candles: a candle whose high exceeds the two highs on either side.
pub fn fractal_high(candles: &[Candle], lookback: usize) -> Option<f64> {
    find_fractal(candles, lookback, |pivot, other| pivot.high > other.high).map(|c| c.high)
}

/// Low of the most recent confirmed down-fractal within the last `lookback` candles.
pub fn fractal_low(candles: &[Candle], lookback: usize) -> Option<f64> {
    find_fractal(candles, lookback, |pivot, other| pivot.low < other.low).map(|c| c.low)
}

fn find_fractal<F>(candles: &[Candle], lookback: usize, dominates: F) -> Option<&Candle>
where
    F: Fn(&Candle, &Candle) -> bool,
{
    if candles.len() < 2 * FRACTAL_WING + 1 {
        return None;
    }

    let first = FRACTAL_WING.max(candles.len().saturating_sub(lookback));
    let last = candles.len() - 1 - FRACTAL_WING;

    (first..=last)
        .rev()
        .find(|&i| {
            (i - FRACTAL_WING..=i + FRACTAL_WING)
                .filter(|&j| j != i)
                .all(|j| dominates(&candles[i], &candles[j]))
        })
        .map(|i| &candles[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(high: f64, low: f64) -> Candle {
        let mid = (high + low) / 2.0;
        Candle {
            open: mid,
            high,
            low,
            close: mid,
            volume: 0.0,
            timestamp: 0,
        }
    }

    #[test]
    fn test_adx_short_series_is_neutral() {
        let candles = vec![bar(1.1, 1.0); 10];
        assert_eq!(adx(&candles, 14), ADX_NEUTRAL);
    }

    #[test]
    fn test_adx_strong_one_way_trend() {
        let candles: Vec<Candle> = (0..30)
            .map(|i| bar(1.01 + i as f64 * 0.001, 1.0 + i as f64 * 0.001))
            .collect();
        assert!((adx(&candles, 14) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_adx_choppy_market_is_weak() {
        let candles: Vec<Candle> = (0..30)
            .map(|i| {
                if i % 2 == 0 {
                    bar(1.012, 1.002)
                } else {
                    bar(1.010, 1.000)
                }
            })
            .collect();
        assert!(adx(&candles, 14) < 25.0);
    }

    #[test]
    fn test_fractals_find_most_recent_pivot() {
        let highs = [1.0, 1.1, 1.5, 1.2, 1.1, 1.3, 1.9, 1.4, 1.2, 1.25];
        let candles: Vec<Candle> = highs.iter().map(|&h| bar(h, h - 0.5)).collect();

        assert_eq!(fractal_high(&candles, 30), Some(1.9));
        let low = fractal_low(&candles, 30).unwrap();
        assert!((low - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_fractal_respects_lookback() {
        let highs = [1.0, 1.1, 1.5, 1.2, 1.1, 1.15, 1.2, 1.25, 1.3, 1.35];
        let candles: Vec<Candle> = highs.iter().map(|&h| bar(h, h - 0.5)).collect();

        assert_eq!(fractal_high(&candles, 30), Some(1.5));
        assert_eq!(fractal_high(&candles, 5), None);
    }

    #[test]
    fn test_no_fractal_in_monotonic_series() {
        let candles: Vec<Candle> = (0..20)
            .map(|i| bar(1.0 + i as f64 * 0.01, 0.9 + i as f64 * 0.01))
            .collect();
        assert_eq!(fractal_high(&candles, 30), None);
        assert_eq!(fractal_low(&candles, 30), None);
        assert_eq!(fractal_high(&candles[..3], 30), None);
    }
}
