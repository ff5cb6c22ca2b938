use super::policy::IndicatorPeriods;
use crate::application::indicators::{
    adx, atr, bollinger_bands, detect_patterns, divergence, ema, fractal_high, fractal_low, macd,
    rsi, sma, stochastic_k, volume_surge,
};
use crate::domain::errors::IndicatorError;
use crate::domain::market::CandleSeries;
use crate::domain::signal::IndicatorSet;

/// Compute every indicator over the series.
///
/// Short series are fine (each indicator falls back to its neutral value);
/// only an empty series or a non-finite result is an error.
pub fn compute_indicators(
    series: &CandleSeries,
    periods: &IndicatorPeriods,
) -> Result<IndicatorSet, IndicatorError> {
    let candles = &series.candles;
    let Some(last) = series.last() else {
        return Err(IndicatorError::InsufficientData {
            needed: 1,
            available: 0,
        });
    };

    let prices = series.closes();
    let slope_base = if prices.len() > periods.ema_slope_offset {
        &prices[..prices.len() - periods.ema_slope_offset]
    } else {
        &prices[..]
    };

    let set = IndicatorSet {
        last_close: last.close,
        last_candle_bullish: last.is_bullish(),
        sma_20: sma(&prices, periods.sma),
        ema_20: ema(&prices, periods.ema_fast),
        ema_50: ema(&prices, periods.ema_slow),
        ema_200: ema(&prices, periods.ema_trend),
        ema_50_prev: ema(slope_base, periods.ema_slow),
        rsi: rsi(&prices, periods.rsi),
        atr: atr(candles, periods.atr),
        macd: macd(&prices),
        bollinger: bollinger_bands(&prices, periods.bollinger, periods.bollinger_std_dev),
        stochastic_k: stochastic_k(candles, periods.stochastic),
        adx: adx(candles, periods.adx),
        fractal_high: fractal_high(candles, periods.fractal_lookback),
        fractal_low: fractal_low(candles, periods.fractal_lookback),
        patterns: detect_patterns(candles),
        divergence: divergence(&prices, periods.divergence_lookback, periods.rsi),
        volume_surge: volume_surge(
            candles,
            periods.volume_average,
            periods.volume_surge_multiplier,
        ),
        synthetic: series.is_synthetic(),
    };

    ensure_finite(&set)?;
    Ok(set)
}

fn ensure_finite(set: &IndicatorSet) -> Result<(), IndicatorError> {
    let readings = [
        ("close", set.last_close),
        ("sma", set.sma_20),
        ("ema_fast", set.ema_20),
        ("ema_slow", set.ema_50),
        ("ema_trend", set.ema_200),
        ("rsi", set.rsi),
        ("atr", set.atr),
        ("macd", set.macd.histogram),
        ("bollinger", set.bollinger.width()),
        ("stochastic", set.stochastic_k),
        ("adx", set.adx),
    ];

    match readings.iter().find(|(_, value)| !value.is_finite()) {
        Some(&(indicator, _)) => Err(IndicatorError::NonFinite { indicator }),
        None => Ok(()),
    }
}
