use super::composer::price_levels;
use super::policy::SignalPolicy;
use crate::domain::market::{CurrencyPair, MarketSession};
use crate::domain::signal::{Action, Signal, SignalTier, SignalWindow, price_level};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Context-free signal used when the pipeline cannot produce one.
///
/// Direction is random, levels are built from the pair's reference price and
/// a stand-in ATR, confidence is the fixed fallback value.
pub fn fallback_signal<R: Rng>(
    pair: &CurrencyPair,
    is_manual: bool,
    now: DateTime<Utc>,
    policy: &SignalPolicy,
    rng: &mut R,
) -> Signal {
    let action = if rng.random_bool(0.5) {
        Action::Buy
    } else {
        Action::Sell
    };
    let atr = policy.fallback.atr_pips * pair.pip_size();
    let levels = price_levels(pair, pair.base_price(), atr, action, None, policy);
    let window = SignalWindow::next_m5(now);

    Signal {
        pair: pair.clone(),
        action,
        entry_price: price_level(levels.entry, pair),
        stop_loss: price_level(levels.stop_loss, pair),
        take_profit: price_level(levels.take_profit, pair),
        confidence: policy.fallback.confidence,
        session: MarketSession::at(now),
        tier: SignalTier::Fallback,
        reasoning: format!(
            "{} {} | market analysis unavailable, reference levels only | window {} - {}",
            SignalTier::Fallback,
            action,
            window.start_label(),
            window.end_label()
        ),
        valid_from: window.valid_from,
        valid_to: window.valid_to,
        is_manual,
        sent_flag: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fallback_is_well_formed() {
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 17, 2, 0).unwrap();
        let pair = CurrencyPair::new("USD/JPY");
        let policy = SignalPolicy::default();

        for seed in 0..8 {
            let signal = fallback_signal(&pair, false, now, &policy, &mut StdRng::seed_from_u64(seed));

            assert_eq!(signal.tier, SignalTier::Fallback);
            assert_eq!(signal.confidence, 60);
            assert_eq!(signal.entry_price.to_string(), "145.230");
            assert_eq!(signal.entry_price.scale(), 3);
            match signal.action {
                Action::Buy => {
                    assert!(signal.stop_loss < signal.entry_price);
                    assert!(signal.entry_price < signal.take_profit);
                }
                Action::Sell => {
                    assert!(signal.stop_loss > signal.entry_price);
                    assert!(signal.entry_price > signal.take_profit);
                }
            }
            assert_eq!(signal.session, MarketSession::NewYork);
        }
    }

    #[test]
    fn test_fallback_direction_varies() {
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap();
        let pair = CurrencyPair::new("EUR/USD");
        let policy = SignalPolicy::default();
        let mut rng = StdRng::seed_from_u64(1);

        let actions: Vec<Action> = (0..32)
            .map(|_| fallback_signal(&pair, true, now, &policy, &mut rng).action)
            .collect();
        assert!(actions.contains(&Action::Buy));
        assert!(actions.contains(&Action::Sell));
    }
}
