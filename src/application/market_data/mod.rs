// Price history acquisition: ordered provider fallback + synthetic last resort
pub mod price_history;
pub mod provider_catalog;
pub mod synthetic;

pub use price_history::{FetchState, PriceHistorySettings, PriceHistorySource};
pub use provider_catalog::ProviderCatalog;
