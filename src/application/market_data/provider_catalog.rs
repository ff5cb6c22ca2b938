use crate::domain::market::CurrencyPair;

/// Venues queried in order when none are configured
pub const DEFAULT_VENUES: [&str; 5] = ["FX_IDC", "FOREXCOM", "OANDA", "SAXO", "ICM"];

/// Venues whose symbols are the concatenated form (`EURUSD`)
const COMPACT_SYMBOL_VENUES: [&str; 2] = ["FX_IDC", "ICM"];

/// Ordered list of liquidity venues, expanded into provider ids per pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCatalog {
    venues: Vec<String>,
}

impl Default for ProviderCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_VENUES)
    }
}

impl ProviderCatalog {
    pub fn new<I, S>(venues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let venues = venues
            .into_iter()
            .map(|v| v.as_ref().trim().to_uppercase())
            .filter(|v| !v.is_empty())
            .collect();
        Self { venues }
    }

    pub fn venues(&self) -> &[String] {
        &self.venues
    }

    /// `VENUE:SYMBOL` ids in venue order, e.g. `OANDA:EUR_USD`, `ICM:EURUSD`
    pub fn provider_ids(&self, pair: &CurrencyPair) -> Vec<String> {
        self.venues
            .iter()
            .map(|venue| {
                let symbol = if COMPACT_SYMBOL_VENUES.contains(&venue.as_str()) {
                    pair.compact_symbol()
                } else {
                    pair.underscore_symbol()
                };
                format!("{}:{}", venue, symbol)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ids_preserve_order_and_symbol_style() {
        let ids = ProviderCatalog::default().provider_ids(&CurrencyPair::new("EUR/USD"));
        assert_eq!(
            ids,
            vec![
                "FX_IDC:EURUSD",
                "FOREXCOM:EUR_USD",
                "OANDA:EUR_USD",
                "SAXO:EUR_USD",
                "ICM:EURUSD",
            ]
        );
    }

    #[test]
    fn test_custom_venues_are_normalised() {
        let catalog = ProviderCatalog::new([" oanda ", "", "icm"]);
        assert_eq!(catalog.venues(), ["OANDA", "ICM"]);
        assert_eq!(
            catalog.provider_ids(&CurrencyPair::new("usd/jpy")),
            vec!["OANDA:USD_JPY", "ICM:USDJPY"]
        );
    }
}
