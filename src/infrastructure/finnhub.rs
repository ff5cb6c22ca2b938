//! Finnhub forex candle endpoint.

use crate::domain::errors::MarketDataError;
use crate::domain::market::CandleResponse;
use crate::domain::ports::{CandleProvider, CandleRequest};
use crate::infrastructure::core::HttpClientFactory;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

pub struct FinnhubCandleProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl FinnhubCandleProvider {
    pub fn new(api_key: Option<String>, base_url: String, timeout: Duration) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: HttpClientFactory::create_client(timeout),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CandleProvider for FinnhubCandleProvider {
    /// `GET /forex/candle?symbol=OANDA:EUR_USD&resolution=5&from=..&to=..&token=..`
    async fn fetch_candles(
        &self,
        provider_id: &str,
        request: &CandleRequest,
    ) -> Result<CandleResponse, MarketDataError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(MarketDataError::NotConfigured {
                reason: "FINNHUB_API_KEY is not set".to_string(),
            });
        };

        let url = format!("{}/forex/candle", self.base_url);
        debug!("Finnhub: GET {} symbol={}", url, provider_id);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", provider_id.to_string()),
                ("resolution", request.resolution.to_string()),
                ("from", request.from.to_string()),
                ("to", request.to.to_string()),
                ("token", api_key.to_string()),
            ])
            .send()
            .await
            .map_err(|e| MarketDataError::Request {
                provider: provider_id.to_string(),
                reason: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::HttpStatus {
                provider: provider_id.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<CandleResponse>()
            .await
            .map_err(|e| MarketDataError::Decode {
                provider: provider_id.to_string(),
                reason: e.without_url().to_string(),
            })
    }
}
