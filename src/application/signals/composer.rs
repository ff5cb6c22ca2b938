use super::policy::SignalPolicy;
use crate::domain::market::{CurrencyPair, MarketSession};
use crate::domain::signal::{
    Action, IndicatorSet, ScoreResult, Signal, SignalTier, SignalWindow, price_level,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Which tier fired and how confident it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub tier: SignalTier,
    pub confidence: u8,
}

/// Raw (unrounded) entry, stop and target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceLevels {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// ATR-based levels around `entry`, with the stop pushed beyond a nearby
/// fractal when one sits between the ATR stop and the entry.
pub fn price_levels(
    pair: &CurrencyPair,
    entry: f64,
    atr: f64,
    action: Action,
    structure: Option<f64>,
    policy: &SignalPolicy,
) -> PriceLevels {
    let levels = &policy.levels;
    let distance = (levels.stop_atr_multiplier * atr).max(levels.min_stop_pips * pair.pip_size());
    let direction = action.direction();

    let mut stop_loss = entry - direction * distance;
    if let Some(level) = structure {
        let gap = (entry - level) * direction;
        if gap > 0.0 && gap <= levels.structure_max_atr * atr {
            let beyond = level - direction * levels.structure_buffer_atr * atr;
            stop_loss = match action {
                Action::Buy => stop_loss.min(beyond),
                Action::Sell => stop_loss.max(beyond),
            };
        }
    }

    let risk = (entry - stop_loss).abs();
    PriceLevels {
        entry,
        stop_loss,
        take_profit: entry + direction * levels.reward_risk * risk,
    }
}

/// Turns a score into a concrete M5 signal
pub struct SignalComposer {
    policy: Arc<SignalPolicy>,
}

impl SignalComposer {
    pub fn new(policy: Arc<SignalPolicy>) -> Self {
        Self { policy }
    }

    pub fn compose(
        &self,
        pair: &CurrencyPair,
        set: &IndicatorSet,
        score: &ScoreResult,
        is_manual: bool,
    ) -> Signal {
        self.compose_at(pair, set, score, is_manual, Utc::now())
    }

    pub fn compose_at(
        &self,
        pair: &CurrencyPair,
        set: &IndicatorSet,
        score: &ScoreResult,
        is_manual: bool,
        now: DateTime<Utc>,
    ) -> Signal {
        let decision = self.decide(set, score);
        let structure = match decision.action {
            Action::Buy => set.fractal_low,
            Action::Sell => set.fractal_high,
        };
        let levels = price_levels(
            pair,
            set.last_close,
            set.atr,
            decision.action,
            structure,
            &self.policy,
        );
        let window = SignalWindow::next_m5(now);

        Signal {
            pair: pair.clone(),
            action: decision.action,
            entry_price: price_level(levels.entry, pair),
            stop_loss: price_level(levels.stop_loss, pair),
            take_profit: price_level(levels.take_profit, pair),
            confidence: decision.confidence,
            session: MarketSession::at(now),
            tier: decision.tier,
            reasoning: reasoning(&decision, score, set.synthetic, &window),
            valid_from: window.valid_from,
            valid_to: window.valid_to,
            is_manual,
            sent_flag: false,
        }
    }

    /// First matching tier wins: extreme, elite, then standard
    pub fn decide(&self, set: &IndicatorSet, score: &ScoreResult) -> Decision {
        let tiers = &self.policy.tiers;
        let action = Action::from_score(score.score);
        let magnitude = score.score.abs();
        let proximity = self.policy.scoring.structure_proximity_atr * set.atr;

        let (trend_aligned, pattern_aligned, level_aligned) = match action {
            Action::Buy => (
                set.last_close > set.ema_200 && set.ema_20 > set.ema_50,
                set.patterns.bullish() || set.divergence.bullish,
                set.near_support(proximity) || set.at_lower_band(),
            ),
            Action::Sell => (
                set.last_close < set.ema_200 && set.ema_20 < set.ema_50,
                set.patterns.bearish() || set.divergence.bearish,
                set.near_resistance(proximity) || set.at_upper_band(),
            ),
        };

        let (tier, confidence) = if magnitude >= tiers.extreme_score
            && trend_aligned
            && pattern_aligned
            && level_aligned
        {
            (SignalTier::Extreme, tiers.extreme_confidence)
        } else if magnitude >= tiers.elite_score && trend_aligned {
            (SignalTier::Elite, tiers.elite_confidence)
        } else {
            let scaled = (magnitude * tiers.standard_factor).round();
            (
                SignalTier::Standard,
                scaled.min(f64::from(tiers.standard_cap)) as u8,
            )
        };

        let confidence = if set.synthetic {
            confidence.min(tiers.synthetic_cap)
        } else {
            confidence
        };

        Decision {
            action,
            tier,
            confidence: confidence.min(100),
        }
    }
}

fn reasoning(
    decision: &Decision,
    score: &ScoreResult,
    synthetic: bool,
    window: &SignalWindow,
) -> String {
    let mut parts = vec![
        format!("{} {}", decision.tier, decision.action),
        format!("score {:+.2}", score.score),
    ];
    if !score.safety_flags.is_empty() {
        let flags: Vec<String> = score.safety_flags.iter().map(|f| f.to_string()).collect();
        parts.push(format!("safety: {}", flags.join(", ")));
    }
    if score.advisory_contribution != 0.0 {
        parts.push(format!("advisory {:+.2}", score.advisory_contribution));
    }
    if synthetic {
        parts.push("synthetic data, confidence capped".to_string());
    }
    parts.push(format!(
        "window {} - {}",
        window.start_label(),
        window.end_label()
    ));
    parts.join(" | ")
}
