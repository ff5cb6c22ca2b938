use crate::domain::errors::{AdvisoryError, MarketDataError};
use crate::domain::market::{CandleResponse, CurrencyPair};
use crate::domain::signal::AdvisoryOpinion;
use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;

/// Time range and resolution for one candle request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleRequest {
    pub pair: CurrencyPair,
    /// Unix seconds, inclusive
    pub from: i64,
    /// Unix seconds, inclusive
    pub to: i64,
    /// Minutes per candle
    pub resolution: u32,
}

/// One upstream endpoint able to serve candles for a provider id such as `OANDA:EUR_USD`
#[async_trait]
pub trait CandleProvider: Send + Sync {
    async fn fetch_candles(
        &self,
        provider_id: &str,
        request: &CandleRequest,
    ) -> Result<CandleResponse, MarketDataError>;
}

/// Context handed to the advisory service
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryContext {
    pub pair: CurrencyPair,
    pub indicator_summary: String,
    pub technical_score: f64,
}

/// Optional external analysis. Callers must check `is_configured()` and treat
/// every error like an absent opinion.
#[async_trait]
pub trait AdvisoryService: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn opinion(
        &self,
        context: &AdvisoryContext,
    ) -> Result<Option<AdvisoryOpinion>, AdvisoryError>;
}

/// Outbound text sink (chat bot, log, ...)
#[async_trait]
pub trait Notifier: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn notify(&self, text: &str) -> Result<()>;
}

/// Hands out independent RNGs so no generator state is shared between calls.
/// Tests inject a seeded source for deterministic fallback paths.
pub trait RandomSource: Send + Sync {
    fn rng(&self) -> StdRng;
}
