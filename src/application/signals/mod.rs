// Signal pipeline: indicator snapshot -> confluence score -> composed signal
pub mod composer;
pub mod fallback;
pub mod generator;
pub mod indicator_set;
pub mod policy;
pub mod scorer;

pub use composer::{Decision, PriceLevels, SignalComposer, price_levels};
pub use fallback::fallback_signal;
pub use generator::SignalGenerator;
pub use indicator_set::compute_indicators;
pub use policy::SignalPolicy;
pub use scorer::ConfluenceScorer;
