use crate::domain::signal::ScoreCondition;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Indicator periods used when building an [`IndicatorSet`](crate::domain::signal::IndicatorSet)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorPeriods {
    pub sma: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub ema_trend: usize,
    /// Candles dropped to read the previous EMA(slow) for the slope proxy
    pub ema_slope_offset: usize,
    pub rsi: usize,
    pub atr: usize,
    pub bollinger: usize,
    pub bollinger_std_dev: f64,
    pub stochastic: usize,
    pub adx: usize,
    pub fractal_lookback: usize,
    pub divergence_lookback: usize,
    pub volume_average: usize,
    pub volume_surge_multiplier: f64,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            sma: 20,
            ema_fast: 20,
            ema_slow: 50,
            ema_trend: 200,
            ema_slope_offset: 5,
            rsi: 14,
            atr: 14,
            bollinger: 20,
            bollinger_std_dev: 2.0,
            stochastic: 14,
            adx: 14,
            fractal_lookback: 30,
            divergence_lookback: 10,
            volume_average: 20,
            volume_surge_multiplier: 1.5,
        }
    }
}

/// Thresholds read by the scorer and its safety overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringThresholds {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub stochastic_oversold: f64,
    pub stochastic_overbought: f64,
    /// Structure counts as "near" within this many ATRs
    pub structure_proximity_atr: f64,
    /// Advisory confidence is divided by this before entering the score
    pub advisory_divisor: f64,
    pub counter_trend_factor: f64,
    pub overextension_factor: f64,
    /// ADX at or above this is a strong trend
    pub strong_trend_adx: f64,
    pub weak_trend_factor: f64,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            stochastic_oversold: 5.0,
            stochastic_overbought: 95.0,
            structure_proximity_atr: 0.5,
            advisory_divisor: 8.0,
            counter_trend_factor: 0.25,
            overextension_factor: 0.5,
            strong_trend_adx: 25.0,
            weak_trend_factor: 0.6,
        }
    }
}

/// Decision tiers and confidence mapping for the composer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub extreme_score: f64,
    pub extreme_confidence: u8,
    pub elite_score: f64,
    pub elite_confidence: u8,
    /// Standard tier confidence = min(cap, |score| * factor)
    pub standard_factor: f64,
    pub standard_cap: u8,
    /// Ceiling applied when the series came from the synthetic fallback
    pub synthetic_cap: u8,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            extreme_score: 12.0,
            extreme_confidence: 99,
            elite_score: 8.0,
            elite_confidence: 94,
            standard_factor: 7.0,
            standard_cap: 90,
            synthetic_cap: 55,
        }
    }
}

/// ATR-scaled entry / stop / target placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelPolicy {
    pub stop_atr_multiplier: f64,
    /// Stop distance never shrinks below this many pips
    pub min_stop_pips: f64,
    /// Stop sits this many ATRs beyond a fractal level
    pub structure_buffer_atr: f64,
    /// Fractals further than this many ATRs from entry are ignored
    pub structure_max_atr: f64,
    pub reward_risk: f64,
}

impl Default for LevelPolicy {
    fn default() -> Self {
        Self {
            stop_atr_multiplier: 1.5,
            min_stop_pips: 3.0,
            structure_buffer_atr: 0.1,
            structure_max_atr: 3.0,
            reward_risk: 2.0,
        }
    }
}

/// Context-free signal returned when the pipeline cannot run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPolicy {
    /// Stand-in ATR, in pips
    pub atr_pips: f64,
    pub confidence: u8,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            atr_pips: 10.0,
            confidence: 60,
        }
    }
}

/// The whole scoring policy as data.
///
/// Weights are a `{condition: weight}` table; a TOML file only needs to name
/// what it changes:
///
/// ```toml
/// [weights]
/// divergence = 4
///
/// [tiers]
/// elite_score = 7.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalPolicy {
    #[serde(deserialize_with = "merge_weights")]
    pub weights: BTreeMap<ScoreCondition, f64>,
    pub indicators: IndicatorPeriods,
    pub scoring: ScoringThresholds,
    pub tiers: TierThresholds,
    pub levels: LevelPolicy,
    pub fallback: FallbackPolicy,
}

impl Default for SignalPolicy {
    fn default() -> Self {
        Self {
            weights: default_weights(),
            indicators: IndicatorPeriods::default(),
            scoring: ScoringThresholds::default(),
            tiers: TierThresholds::default(),
            levels: LevelPolicy::default(),
            fallback: FallbackPolicy::default(),
        }
    }
}

impl SignalPolicy {
    /// Weight for a condition; conditions missing from the table score nothing
    pub fn weight(&self, condition: ScoreCondition) -> f64 {
        self.weights.get(&condition).copied().unwrap_or(0.0)
    }

    pub fn with_weight(mut self, condition: ScoreCondition, weight: f64) -> Self {
        self.weights.insert(condition, weight);
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse signal policy TOML")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read signal policy file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid signal policy file: {}", path.display()))
    }
}

/// Default weight table
///
/// | condition              | weight |
/// |------------------------|--------|
/// | long_term_trend        | 3      |
/// | ema_cross              | 2      |
/// | macd_momentum          | 2      |
/// | rsi_extreme            | 2      |
/// | bollinger_touch        | 2      |
/// | structure_level        | 2      |
/// | divergence             | 3      |
/// | candle_pattern         | 1      |
/// | pattern_at_level       | 3      |
/// | volume_surge           | 1      |
/// | higher_timeframe_trend | 2      |
pub fn default_weights() -> BTreeMap<ScoreCondition, f64> {
    use ScoreCondition::*;

    BTreeMap::from([
        (LongTermTrend, 3.0),
        (EmaCross, 2.0),
        (MacdMomentum, 2.0),
        (RsiExtreme, 2.0),
        (BollingerTouch, 2.0),
        (StructureLevel, 2.0),
        (Divergence, 3.0),
        (CandlePattern, 1.0),
        (PatternAtLevel, 3.0),
        (VolumeSurge, 1.0),
        (HigherTimeframeTrend, 2.0),
    ])
}

// A partial [weights] table overrides only the entries it names
fn merge_weights<'de, D>(deserializer: D) -> Result<BTreeMap<ScoreCondition, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<ScoreCondition, f64>::deserialize(deserializer)?;
    let mut weights = default_weights();
    weights.extend(overrides);
    Ok(weights)
}
