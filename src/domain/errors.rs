use thiserror::Error;

/// Errors related to upstream price-history providers
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Market data provider is not configured: {reason}")]
    NotConfigured { reason: String },

    #[error("Provider {provider} failed with HTTP status {status}")]
    HttpStatus { provider: String, status: u16 },

    #[error("Request to {provider} failed: {reason}")]
    Request { provider: String, reason: String },

    #[error("Provider {provider} timed out after {duration_ms}ms")]
    Timeout { provider: String, duration_ms: u64 },

    #[error("Provider {provider} returned status '{status}' with {points} points")]
    UnusableResponse {
        provider: String,
        status: String,
        points: usize,
    },

    #[error("Failed to decode response from {provider}: {reason}")]
    Decode { provider: String, reason: String },

    #[error("All {attempts} providers failed for {pair}")]
    ProvidersExhausted { pair: String, attempts: usize },
}

/// Errors raised by the optional advisory collaborator.
/// The generator treats every variant exactly like an absent opinion.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("Advisory service is not configured")]
    NotConfigured,

    #[error("Advisory request failed: {reason}")]
    Request { reason: String },

    #[error("Advisory response is malformed: {reason}")]
    Malformed { reason: String },
}

/// Errors raised while turning a candle series into an indicator snapshot
#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("Insufficient data: need {needed} candles, have {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("Indicator {indicator} produced a non-finite value")]
    NonFinite { indicator: &'static str },
}
