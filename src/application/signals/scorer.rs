use super::policy::SignalPolicy;
use crate::domain::signal::{
    Action, AdvisoryOpinion, Contribution, IndicatorSet, SafetyReason, ScoreCondition, ScoreResult,
};
use std::sync::Arc;

/// -1, 0 or +1 depending on which side of `b` the value `a` sits
fn side(a: f64, b: f64) -> f64 {
    if a > b {
        1.0
    } else if a < b {
        -1.0
    } else {
        0.0
    }
}

fn vote(bullish: bool, bearish: bool) -> f64 {
    f64::from(u8::from(bullish)) - f64::from(u8::from(bearish))
}

/// Weighted confluence score with ordered safety overrides.
///
/// Each condition votes -1, 0 or +1 and is multiplied by its weight from the
/// policy table. An advisory opinion adds `confidence / 8` in its direction.
/// The raw sum then passes through, in order:
///
/// 1. counter-trend penalty (score disagrees with close vs. EMA200)
/// 2. overextension penalty (bullish at the upper band / overbought, or the mirror)
/// 3. weak-trend dampening (ADX below the strong-trend threshold)
pub struct ConfluenceScorer {
    policy: Arc<SignalPolicy>,
}

impl ConfluenceScorer {
    pub fn new(policy: Arc<SignalPolicy>) -> Self {
        Self { policy }
    }

    pub fn score(&self, set: &IndicatorSet, advisory: Option<&AdvisoryOpinion>) -> ScoreResult {
        let contributions = self.contributions(set);
        let technical: f64 = contributions.iter().map(|c| c.value).sum();

        let advisory_contribution = advisory
            .map(|opinion| {
                opinion.action.direction() * f64::from(opinion.confidence)
                    / self.policy.scoring.advisory_divisor
            })
            .unwrap_or(0.0);

        let raw_score = technical + advisory_contribution;
        let (score, safety_flags) = self.apply_safety_overrides(set, raw_score);

        ScoreResult {
            score,
            raw_score,
            safety_flags,
            strong_trend: set.adx >= self.policy.scoring.strong_trend_adx,
            contributions,
            advisory_contribution,
        }
    }

    /// Signed, weighted votes of every condition that fired (zeros omitted)
    pub fn contributions(&self, set: &IndicatorSet) -> Vec<Contribution> {
        let thresholds = &self.policy.scoring;
        let proximity = thresholds.structure_proximity_atr * set.atr;

        let near_support = set.near_support(proximity);
        let near_resistance = set.near_resistance(proximity);
        let bullish_pattern = set.patterns.bullish();
        let bearish_pattern = set.patterns.bearish();

        // Collapsed bands (short series) never count as a touch
        let band_touch = vote(set.at_lower_band(), set.at_upper_band());

        let volume = if set.volume_surge {
            if set.last_candle_bullish { 1.0 } else { -1.0 }
        } else {
            0.0
        };

        let votes = [
            (ScoreCondition::LongTermTrend, set.long_term_trend()),
            (ScoreCondition::EmaCross, side(set.ema_20, set.ema_50)),
            (ScoreCondition::MacdMomentum, side(set.macd.histogram, 0.0)),
            (
                ScoreCondition::RsiExtreme,
                vote(
                    set.rsi < thresholds.rsi_oversold,
                    set.rsi > thresholds.rsi_overbought,
                ),
            ),
            (ScoreCondition::BollingerTouch, band_touch),
            (
                ScoreCondition::StructureLevel,
                vote(near_support, near_resistance),
            ),
            (
                ScoreCondition::Divergence,
                vote(set.divergence.bullish, set.divergence.bearish),
            ),
            (
                ScoreCondition::CandlePattern,
                vote(bullish_pattern, bearish_pattern),
            ),
            (
                ScoreCondition::PatternAtLevel,
                vote(
                    bullish_pattern && (near_support || set.at_lower_band()),
                    bearish_pattern && (near_resistance || set.at_upper_band()),
                ),
            ),
            (ScoreCondition::VolumeSurge, volume),
            (
                ScoreCondition::HigherTimeframeTrend,
                side(set.ema_50, set.ema_50_prev),
            ),
        ];

        votes
            .into_iter()
            .filter(|&(_, direction)| direction != 0.0)
            .map(|(condition, direction)| Contribution {
                condition,
                value: direction * self.policy.weight(condition),
            })
            .filter(|c| c.value != 0.0)
            .collect()
    }

    fn apply_safety_overrides(&self, set: &IndicatorSet, raw: f64) -> (f64, Vec<SafetyReason>) {
        let t = &self.policy.scoring;
        let mut score = raw;
        let mut flags = Vec::new();

        if score * set.long_term_trend() < 0.0 {
            score *= t.counter_trend_factor;
            flags.push(SafetyReason::CounterTrend);
        }

        if score > 0.0
            && (set.at_upper_band()
                || set.rsi > t.rsi_overbought
                || set.stochastic_k >= t.stochastic_overbought)
        {
            score *= t.overextension_factor;
            flags.push(SafetyReason::Overbought);
        } else if score < 0.0
            && (set.at_lower_band()
                || set.rsi < t.rsi_oversold
                || set.stochastic_k <= t.stochastic_oversold)
        {
            score *= t.overextension_factor;
            flags.push(SafetyReason::Oversold);
        }

        if set.adx < t.strong_trend_adx {
            score *= t.weak_trend_factor;
            flags.push(SafetyReason::WeakTrend);
        }

        (score, flags)
    }
}

/// Direction the score points to, with the flags that shaped it
pub fn describe(result: &ScoreResult) -> String {
    let action = Action::from_score(result.score);
    if result.safety_flags.is_empty() {
        format!("{} bias, score {:+.2}", action, result.score)
    } else {
        let flags: Vec<String> = result.safety_flags.iter().map(|f| f.to_string()).collect();
        format!(
            "{} bias, score {:+.2} (dampened: {})",
            action,
            result.score,
            flags.join(", ")
        )
    }
}
