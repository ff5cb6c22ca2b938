use serde::{Deserialize, Serialize};
use std::fmt;

/// A currency pair in slash notation, e.g. `EUR/USD`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyPair(String);

impl CurrencyPair {
    pub fn new(pair: &str) -> Self {
        Self(pair.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// JPY-quoted pairs trade with 2-3 significant decimals instead of 4-5
    pub fn is_jpy(&self) -> bool {
        self.0.contains("JPY")
    }

    /// Number of decimal places used when rendering price levels
    pub fn precision(&self) -> u32 {
        if self.is_jpy() { 3 } else { 5 }
    }

    pub fn pip_size(&self) -> f64 {
        if self.is_jpy() { 0.01 } else { 0.0001 }
    }

    /// `EURUSD`
    pub fn compact_symbol(&self) -> String {
        self.0.replace('/', "")
    }

    /// `EUR_USD`
    pub fn underscore_symbol(&self) -> String {
        self.0.replace('/', "_")
    }

    /// Reference price used to seed synthetic history and the fallback signal
    pub fn base_price(&self) -> f64 {
        match self.0.as_str() {
            "EUR/USD" => 1.0854,
            "GBP/USD" => 1.2710,
            "AUD/USD" => 0.6590,
            "NZD/USD" => 0.6050,
            "USD/CAD" => 1.3620,
            "USD/CHF" => 0.8840,
            "EUR/GBP" => 0.8540,
            "USD/JPY" => 145.23,
            "EUR/JPY" => 157.60,
            "GBP/JPY" => 184.50,
            _ if self.is_jpy() => 145.23,
            _ => 1.0854,
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyPair {
    fn from(pair: &str) -> Self {
        Self::new(pair)
    }
}
