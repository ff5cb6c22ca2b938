use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacdValue {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BollingerValue {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerValue {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatternFlags {
    pub bullish_engulfing: bool,
    pub bearish_engulfing: bool,
    pub bullish_pin_bar: bool,
    pub bearish_pin_bar: bool,
}

impl PatternFlags {
    pub fn bullish(&self) -> bool {
        self.bullish_engulfing || self.bullish_pin_bar
    }

    pub fn bearish(&self) -> bool {
        self.bearish_engulfing || self.bearish_pin_bar
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DivergenceFlags {
    pub bullish: bool,
    pub bearish: bool,
}

/// Immutable snapshot of every indicator the scorer and composer read
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub last_close: f64,
    pub last_candle_bullish: bool,
    pub sma_20: f64,
    pub ema_20: f64,
    pub ema_50: f64,
    pub ema_200: f64,
    /// EMA50 as it stood a few candles ago, for slope
    pub ema_50_prev: f64,
    pub rsi: f64,
    pub atr: f64,
    pub macd: MacdValue,
    pub bollinger: BollingerValue,
    pub stochastic_k: f64,
    pub adx: f64,
    pub fractal_high: Option<f64>,
    pub fractal_low: Option<f64>,
    pub patterns: PatternFlags,
    pub divergence: DivergenceFlags,
    pub volume_surge: bool,
    /// Derived from synthetic fallback data
    pub synthetic: bool,
}

impl IndicatorSet {
    /// +1 above EMA200, -1 below, 0 on it
    pub fn long_term_trend(&self) -> f64 {
        if self.last_close > self.ema_200 {
            1.0
        } else if self.last_close < self.ema_200 {
            -1.0
        } else {
            0.0
        }
    }

    /// Close within `proximity` of the most recent fractal low
    pub fn near_support(&self, proximity: f64) -> bool {
        self.fractal_low
            .is_some_and(|level| (self.last_close - level).abs() <= proximity)
    }

    /// Close within `proximity` of the most recent fractal high
    pub fn near_resistance(&self, proximity: f64) -> bool {
        self.fractal_high
            .is_some_and(|level| (self.last_close - level).abs() <= proximity)
    }

    pub fn at_lower_band(&self) -> bool {
        self.bollinger.width() > 0.0 && self.last_close <= self.bollinger.lower
    }

    pub fn at_upper_band(&self) -> bool {
        self.bollinger.width() > 0.0 && self.last_close >= self.bollinger.upper
    }

    /// Short context line handed to the advisory service
    pub fn summary(&self) -> String {
        format!(
            "close={:.5} ema20={:.5} ema50={:.5} ema200={:.5} rsi={:.1} macd_hist={:.6} atr={:.6} adx={:.1} stoch_k={:.1} bb=[{:.5},{:.5}]",
            self.last_close,
            self.ema_20,
            self.ema_50,
            self.ema_200,
            self.rsi,
            self.macd.histogram,
            self.atr,
            self.adx,
            self.stochastic_k,
            self.bollinger.lower,
            self.bollinger.upper,
        )
    }
}
