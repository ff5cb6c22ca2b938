//! Candlestick patterns, price/RSI divergence and volume surges.

use super::oscillators::rsi;
use crate::domain::market::Candle;
use crate::domain::signal::{DivergenceFlags, PatternFlags};

/// Rejection wick must exceed this multiple of the body
const PIN_WICK_TO_BODY: f64 = 2.5;
/// Body must be smaller than this share of the full range
const PIN_MAX_BODY_SHARE: f64 = 0.35;

const DIVERGENCE_BULLISH_RSI_MAX: f64 = 40.0;
const DIVERGENCE_BEARISH_RSI_MIN: f64 = 60.0;

/// Engulfing and pin-bar flags for the last candle (engulfing also reads the one before)
pub fn detect_patterns(candles: &[Candle]) -> PatternFlags {
    let (bullish_engulfing, bearish_engulfing) = engulfing(candles);
    let (bullish_pin_bar, bearish_pin_bar) = candles.last().map(pin_bar).unwrap_or_default();

    PatternFlags {
        bullish_engulfing,
        bearish_engulfing,
        bullish_pin_bar,
        bearish_pin_bar,
    }
}

/// `(bullish, bearish)` engulfing on the last two candles.
///
/// Bullish: a bearish candle followed by a bullish candle whose body contains
/// the previous body. Bearish is the mirror image.
pub fn engulfing(candles: &[Candle]) -> (bool, bool) {
    let [.., prev, curr] = candles else {
        return (false, false);
    };

    let bullish = prev.close < prev.open
        && curr.close > curr.open
        && curr.open <= prev.close
        && curr.close >= prev.open;
    let bearish = prev.close > prev.open
        && curr.close < curr.open
        && curr.open >= prev.close
        && curr.close <= prev.open;

    (bullish, bearish)
}

/// `(bullish, bearish)` rejection candle.
///
/// Bullish pin: lower wick > 2.5x body, upper wick < body, body < 35% of range.
pub fn pin_bar(candle: &Candle) -> (bool, bool) {
    let range = candle.range();
    if range <= 0.0 {
        return (false, false);
    }

    let body = candle.body();
    let upper = candle.upper_wick();
    let lower = candle.lower_wick();
    let small_body = body < PIN_MAX_BODY_SHARE * range;

    let bullish = small_body && lower > PIN_WICK_TO_BODY * body && upper < body;
    let bearish = small_body && upper > PIN_WICK_TO_BODY * body && lower < body;

    (bullish, bearish)
}

/// Compare price and RSI now against `lookback` candles ago.
///
/// * bullish: lower price, higher RSI, RSI < 40
/// * bearish: higher price, lower RSI, RSI > 60
///
/// Both RSI readings need a full `rsi_period` window; otherwise no flags.
pub fn divergence(prices: &[f64], lookback: usize, rsi_period: usize) -> DivergenceFlags {
    if lookback == 0 || prices.len() < lookback + rsi_period + 1 {
        return DivergenceFlags::default();
    }

    let earlier = &prices[..prices.len() - lookback];
    let (price_now, price_then) = (prices[prices.len() - 1], earlier[earlier.len() - 1]);
    let (rsi_now, rsi_then) = (rsi(prices, rsi_period), rsi(earlier, rsi_period));

    DivergenceFlags {
        bullish: price_now < price_then
            && rsi_now > rsi_then
            && rsi_now < DIVERGENCE_BULLISH_RSI_MAX,
        bearish: price_now > price_then
            && rsi_now < rsi_then
            && rsi_now > DIVERGENCE_BEARISH_RSI_MIN,
    }
}

/// Last candle volume above `multiplier` x the average of the `period` candles before it
pub fn volume_surge(candles: &[Candle], period: usize, multiplier: f64) -> bool {
    if period == 0 || candles.len() < period + 1 {
        return false;
    }

    let last = candles.len() - 1;
    let average = candles[last - period..last].iter().map(|c| c.volume).sum::<f64>() / period as f64;

    average > 0.0 && candles[last].volume > multiplier * average
}
