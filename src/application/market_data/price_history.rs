use super::provider_catalog::ProviderCatalog;
use super::synthetic::synthetic_response;
use crate::domain::errors::MarketDataError;
use crate::domain::market::{Candle, CandleResponse, CandleSeries, CurrencyPair, SeriesOrigin};
use crate::domain::ports::{CandleProvider, CandleRequest, RandomSource};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A response is usable only with more than this many points
pub const MIN_USABLE_POINTS: usize = 5;
/// M5 candles
pub const CANDLE_RESOLUTION_MINUTES: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistorySettings {
    /// Bound on each provider attempt
    pub attempt_timeout: Duration,
    /// How far back each request reaches
    pub lookback: Duration,
    /// Serve a synthetic series instead of failing once every provider is exhausted
    pub synthetic_fallback: bool,
}

impl Default for PriceHistorySettings {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(5),
            lookback: Duration::from_secs(4 * 3600),
            synthetic_fallback: true,
        }
    }
}

/// Progress through the ordered provider list
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    /// Next attempt uses the provider id at this index
    Attempting(usize),
    Success(CandleSeries),
    /// Every provider failed; `attempts` were made
    Exhausted { attempts: usize },
}

/// Ordered, sequential provider fallback with a synthetic last resort.
///
/// Provider ids are tried one at a time; the first usable response wins and
/// nothing after it is requested.
pub struct PriceHistorySource {
    provider: Arc<dyn CandleProvider>,
    catalog: ProviderCatalog,
    random: Arc<dyn RandomSource>,
    settings: PriceHistorySettings,
}

impl PriceHistorySource {
    pub fn new(
        provider: Arc<dyn CandleProvider>,
        catalog: ProviderCatalog,
        random: Arc<dyn RandomSource>,
        settings: PriceHistorySettings,
    ) -> Self {
        Self {
            provider,
            catalog,
            random,
            settings,
        }
    }

    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    pub async fn fetch(&self, pair: &CurrencyPair) -> Result<CandleSeries, MarketDataError> {
        self.fetch_at(pair, Utc::now().timestamp()).await
    }

    /// Fetch a series ending at `now` (unix seconds).
    ///
    /// Fails only when every provider failed and the synthetic fallback is disabled.
    pub async fn fetch_at(
        &self,
        pair: &CurrencyPair,
        now: i64,
    ) -> Result<CandleSeries, MarketDataError> {
        let request = CandleRequest {
            pair: pair.clone(),
            from: now - self.settings.lookback.as_secs() as i64,
            to: now,
            resolution: CANDLE_RESOLUTION_MINUTES,
        };
        let provider_ids = self.catalog.provider_ids(pair);

        let mut state = FetchState::Attempting(0);
        loop {
            state = match state {
                FetchState::Attempting(index) => self.step(index, &provider_ids, &request).await,
                FetchState::Success(series) => return Ok(series),
                FetchState::Exhausted { attempts } => {
                    return self.exhausted(pair, attempts, now);
                }
            };
        }
    }

    async fn step(
        &self,
        index: usize,
        provider_ids: &[String],
        request: &CandleRequest,
    ) -> FetchState {
        let Some(provider_id) = provider_ids.get(index) else {
            return FetchState::Exhausted {
                attempts: provider_ids.len(),
            };
        };

        match self.attempt(provider_id, request).await {
            Ok(candles) => {
                info!(
                    "PriceHistorySource [{}]: {} points from {}",
                    request.pair,
                    candles.len(),
                    provider_id
                );
                FetchState::Success(CandleSeries::new(
                    request.pair.clone(),
                    candles,
                    SeriesOrigin::Provider(provider_id.clone()),
                ))
            }
            Err(e) => {
                warn!(
                    "PriceHistorySource [{}]: attempt {}/{} failed: {}",
                    request.pair,
                    index + 1,
                    provider_ids.len(),
                    e
                );
                FetchState::Attempting(index + 1)
            }
        }
    }

    /// One bounded request plus the usability check, counted on the zipped
    /// candles so ragged columns cannot win
    async fn attempt(
        &self,
        provider_id: &str,
        request: &CandleRequest,
    ) -> Result<Vec<Candle>, MarketDataError> {
        debug!(
            "PriceHistorySource [{}]: requesting {}",
            request.pair, provider_id
        );

        let response = tokio::time::timeout(
            self.settings.attempt_timeout,
            self.provider.fetch_candles(provider_id, request),
        )
        .await
        .map_err(|_| MarketDataError::Timeout {
            provider: provider_id.to_string(),
            duration_ms: self.settings.attempt_timeout.as_millis() as u64,
        })??;

        let ok = response.is_ok();
        let status = response.s.clone();
        let candles = response.into_candles();

        if !ok || candles.len() <= MIN_USABLE_POINTS {
            return Err(MarketDataError::UnusableResponse {
                provider: provider_id.to_string(),
                status,
                points: candles.len(),
            });
        }

        Ok(candles)
    }

    fn exhausted(
        &self,
        pair: &CurrencyPair,
        attempts: usize,
        now: i64,
    ) -> Result<CandleSeries, MarketDataError> {
        let error = MarketDataError::ProvidersExhausted {
            pair: pair.to_string(),
            attempts,
        };

        if !self.settings.synthetic_fallback {
            warn!("PriceHistorySource [{}]: {}", pair, error);
            return Err(error);
        }

        warn!(
            "PriceHistorySource [{}]: {}, serving synthetic series",
            pair, error
        );
        let mut rng = self.random.rng();
        let response = synthetic_response(pair, now, &mut rng);
        Ok(CandleSeries::new(
            pair.clone(),
            response.into_candles(),
            SeriesOrigin::Synthetic,
        ))
    }

    /// Synthetic payload exactly as the fallback would build it
    pub fn synthetic_payload(&self, pair: &CurrencyPair, now: i64) -> CandleResponse {
        synthetic_response(pair, now, &mut self.random.rng())
    }
}
