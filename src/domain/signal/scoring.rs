use serde::{Deserialize, Serialize};
use std::fmt;

/// Named conditions that contribute to the confluence score.
/// The weight of each one lives in the signal policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCondition {
    /// Close vs. EMA200
    LongTermTrend,
    /// EMA20 vs. EMA50
    EmaCross,
    /// MACD histogram sign
    MacdMomentum,
    /// RSI oversold (<30) / overbought (>70)
    RsiExtreme,
    /// Close at or beyond a Bollinger band
    BollingerTouch,
    /// Close near a recent fractal low / high
    StructureLevel,
    /// Price/RSI divergence
    Divergence,
    /// Engulfing or pin bar on the last candle
    CandlePattern,
    /// Pattern printed at support / resistance
    PatternAtLevel,
    /// Last candle volume well above average
    VolumeSurge,
    /// EMA50 slope as a higher-timeframe proxy
    HigherTimeframeTrend,
}

impl ScoreCondition {
    pub const ALL: [ScoreCondition; 11] = [
        ScoreCondition::LongTermTrend,
        ScoreCondition::EmaCross,
        ScoreCondition::MacdMomentum,
        ScoreCondition::RsiExtreme,
        ScoreCondition::BollingerTouch,
        ScoreCondition::StructureLevel,
        ScoreCondition::Divergence,
        ScoreCondition::CandlePattern,
        ScoreCondition::PatternAtLevel,
        ScoreCondition::VolumeSurge,
        ScoreCondition::HigherTimeframeTrend,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScoreCondition::LongTermTrend => "long_term_trend",
            ScoreCondition::EmaCross => "ema_cross",
            ScoreCondition::MacdMomentum => "macd_momentum",
            ScoreCondition::RsiExtreme => "rsi_extreme",
            ScoreCondition::BollingerTouch => "bollinger_touch",
            ScoreCondition::StructureLevel => "structure_level",
            ScoreCondition::Divergence => "divergence",
            ScoreCondition::CandlePattern => "candle_pattern",
            ScoreCondition::PatternAtLevel => "pattern_at_level",
            ScoreCondition::VolumeSurge => "volume_surge",
            ScoreCondition::HigherTimeframeTrend => "higher_timeframe_trend",
        }
    }
}

impl fmt::Display for ScoreCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why the raw score was dampened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyReason {
    CounterTrend,
    Overbought,
    Oversold,
    WeakTrend,
}

impl fmt::Display for SafetyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafetyReason::CounterTrend => write!(f, "counter-trend"),
            SafetyReason::Overbought => write!(f, "overbought"),
            SafetyReason::Oversold => write!(f, "oversold"),
            SafetyReason::WeakTrend => write!(f, "weak trend"),
        }
    }
}

/// A signed contribution from one condition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub condition: ScoreCondition,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Final signed score after safety overrides; positive is bullish
    pub score: f64,
    /// Score before safety overrides (technical + advisory)
    pub raw_score: f64,
    /// Triggered overrides, in application order
    pub safety_flags: Vec<SafetyReason>,
    pub strong_trend: bool,
    pub contributions: Vec<Contribution>,
    /// Signed advisory contribution, zero when absent
    pub advisory_contribution: f64,
}

impl ScoreResult {
    pub fn contribution(&self, condition: ScoreCondition) -> f64 {
        self.contributions
            .iter()
            .filter(|c| c.condition == condition)
            .map(|c| c.value)
            .sum()
    }

    pub fn has_flag(&self, reason: SafetyReason) -> bool {
        self.safety_flags.contains(&reason)
    }
}
