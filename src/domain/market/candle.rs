use super::pair::CurrencyPair;
use serde::{Deserialize, Serialize};

/// One M5 OHLCV bucket. Upstream data is assumed honest and is not re-validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: i64,
}

impl Candle {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// `max(high-low, |high-prevClose|, |low-prevClose|)`
    pub fn true_range(&self, prev_close: f64) -> f64 {
        (self.high - self.low)
            .max((self.high - prev_close).abs())
            .max((self.low - prev_close).abs())
    }
}

/// Columnar candle payload as returned by the candle endpoint:
/// `{ "c": [..], "h": [..], "l": [..], "o": [..], "s": "ok", "t": [..], "v": [..] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandleResponse {
    #[serde(default)]
    pub c: Vec<f64>,
    #[serde(default)]
    pub h: Vec<f64>,
    #[serde(default)]
    pub l: Vec<f64>,
    #[serde(default)]
    pub o: Vec<f64>,
    #[serde(default)]
    pub s: String,
    #[serde(default)]
    pub t: Vec<i64>,
    #[serde(default)]
    pub v: Vec<f64>,
}

impl CandleResponse {
    pub const STATUS_OK: &'static str = "ok";

    pub fn is_ok(&self) -> bool {
        self.s == Self::STATUS_OK
    }

    pub fn len(&self) -> usize {
        self.c.len()
    }

    pub fn is_empty(&self) -> bool {
        self.c.is_empty()
    }

    /// Zips the columns into candles, truncating to the shortest price column.
    /// Missing volume or timestamp columns default to zero.
    pub fn into_candles(self) -> Vec<Candle> {
        let len = self.c.len().min(self.o.len()).min(self.h.len()).min(self.l.len());

        (0..len)
            .map(|i| Candle {
                open: self.o[i],
                high: self.h[i],
                low: self.l[i],
                close: self.c[i],
                volume: self.v.get(i).copied().unwrap_or(0.0),
                timestamp: self.t.get(i).copied().unwrap_or(0),
            })
            .collect()
    }
}

/// Where a candle series came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesOrigin {
    /// Accepted from the named provider id (e.g. `OANDA:EUR_USD`)
    Provider(String),
    /// Generated locally after every provider failed
    Synthetic,
}

/// Time-ordered candles for one pair. Built fresh per generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    pub pair: CurrencyPair,
    pub candles: Vec<Candle>,
    pub origin: SeriesOrigin,
}

impl CandleSeries {
    pub fn new(pair: CurrencyPair, candles: Vec<Candle>, origin: SeriesOrigin) -> Self {
        Self {
            pair,
            candles,
            origin,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin == SeriesOrigin::Synthetic
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_deserializes_columnar_payload() {
        let json = r#"{"c":[1.1,1.2],"h":[1.15,1.25],"l":[1.05,1.15],"o":[1.08,1.1],"s":"ok","t":[100,400],"v":[10,20]}"#;
        let response: CandleResponse = serde_json::from_str(json).unwrap();

        assert!(response.is_ok());
        let candles = response.into_candles();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[1].close, 1.2);
        assert_eq!(candles[1].timestamp, 400);
        assert_eq!(candles[1].volume, 20.0);
    }

    #[test]
    fn test_no_data_payload_has_no_columns() {
        let response: CandleResponse = serde_json::from_str(r#"{"s":"no_data"}"#).unwrap();
        assert!(!response.is_ok());
        assert!(response.is_empty());
        assert!(response.into_candles().is_empty());
    }

    #[test]
    fn test_ragged_columns_truncate() {
        let response = CandleResponse {
            c: vec![1.0, 2.0, 3.0],
            h: vec![1.5, 2.5],
            l: vec![0.5, 1.5, 2.5],
            o: vec![1.0, 2.0, 3.0],
            s: "ok".to_string(),
            t: vec![],
            v: vec![],
        };
        let candles = response.into_candles();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].timestamp, 0);
    }

    #[test]
    fn test_candle_geometry() {
        let candle = Candle {
            open: 1.0,
            high: 1.5,
            low: 0.7,
            close: 1.2,
            volume: 0.0,
            timestamp: 0,
        };
        assert!(candle.is_bullish());
        assert!((candle.upper_wick() - 0.3).abs() < 1e-12);
        assert!((candle.lower_wick() - 0.3).abs() < 1e-12);
        assert!((candle.true_range(2.0) - 1.3).abs() < 1e-12);
    }
}
