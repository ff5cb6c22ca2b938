// Signal domain: indicator snapshot, score, signal record, M5 window
pub mod indicators;
pub mod scoring;
pub mod types;
pub mod window;

pub use indicators::{BollingerValue, DivergenceFlags, IndicatorSet, MacdValue, PatternFlags};
pub use scoring::{Contribution, SafetyReason, ScoreCondition, ScoreResult};
pub use types::{Action, AdvisoryOpinion, Signal, SignalTier, price_level};
pub use window::SignalWindow;
