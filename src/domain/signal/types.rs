use super::window::{SignalWindow, format_display_time};
use crate::domain::market::{CurrencyPair, MarketSession};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    /// +1 for BUY, -1 for SELL
    pub fn direction(&self) -> f64 {
        match self {
            Action::Buy => 1.0,
            Action::Sell => -1.0,
        }
    }

    pub fn from_score(score: f64) -> Self {
        if score >= 0.0 { Action::Buy } else { Action::Sell }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    /// Accepts `BUY`, `SELL` and the binary-option spellings `BUY/CALL`, `SELL/PUT`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" | "CALL" | "BUY/CALL" | "LONG" => Ok(Action::Buy),
            "SELL" | "PUT" | "SELL/PUT" | "SHORT" => Ok(Action::Sell),
            other => anyhow::bail!("Invalid action: {}. Must be 'BUY' or 'SELL'", other),
        }
    }
}

/// Optional directional suggestion from an external analysis service.
/// Untrusted and low-weight; absence is the normal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryOpinion {
    pub action: Action,
    /// 0..=100
    pub confidence: u8,
    pub reasoning: String,
}

/// Which decision tier produced a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalTier {
    Extreme,
    Elite,
    Standard,
    Fallback,
}

impl fmt::Display for SignalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalTier::Extreme => write!(f, "Extreme confluence"),
            SignalTier::Elite => write!(f, "Elite trend alignment"),
            SignalTier::Standard => write!(f, "Standard confluence"),
            SignalTier::Fallback => write!(f, "Fallback"),
        }
    }
}

/// A directional M5 signal. Ownership passes to the caller once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub pair: CurrencyPair,
    pub action: Action,
    /// Prices carry exactly 3 (JPY) or 5 decimal places
    pub entry_price: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    /// 0..=100
    pub confidence: u8,
    pub session: MarketSession,
    pub tier: SignalTier,
    pub reasoning: String,
    pub valid_from: DateTime<FixedOffset>,
    pub valid_to: DateTime<FixedOffset>,
    pub is_manual: bool,
    pub sent_flag: bool,
}

impl Signal {
    pub fn window(&self) -> SignalWindow {
        SignalWindow {
            valid_from: self.valid_from,
            valid_to: self.valid_to,
        }
    }

    /// Plain-text rendering for notification sinks
    pub fn notification_text(&self) -> String {
        format!(
            "{pair} {action}\nEntry: {entry}\nStop Loss: {sl}\nTake Profit: {tp}\nConfidence: {conf}%\nSession: {session}\nStart Time: {start}\nEnd Time: {end}\n{reasoning}",
            pair = self.pair,
            action = self.action,
            entry = self.entry_price,
            sl = self.stop_loss,
            tp = self.take_profit,
            conf = self.confidence,
            session = self.session,
            start = format_display_time(self.valid_from),
            end = format_display_time(self.valid_to),
            reasoning = self.reasoning,
        )
    }
}

/// Round a raw price to the pair's display precision with a fixed scale,
/// so `1.1` renders as `1.10000` and `145.2` as `145.200`.
pub fn price_level(value: f64, pair: &CurrencyPair) -> Decimal {
    let precision = pair.precision();
    let mut level = Decimal::from_f64_retain(value)
        .unwrap_or_default()
        .round_dp(precision);
    level.rescale(precision);
    level
}
