//! Scriptable collaborators for tests and offline runs.

use crate::domain::errors::{AdvisoryError, MarketDataError};
use crate::domain::market::CandleResponse;
use crate::domain::ports::{AdvisoryContext, AdvisoryService, CandleProvider, CandleRequest, Notifier};
use crate::domain::signal::AdvisoryOpinion;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What the mock provider answers for one provider id
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Ok(CandleResponse),
    HttpStatus(u16),
    NetworkError(String),
    /// Answer after a delay (exercises the per-attempt timeout)
    Delayed(Duration, CandleResponse),
}

/// Candle provider answering from a per-id script, recording every call
pub struct MockCandleProvider {
    scripts: Mutex<HashMap<String, ScriptedResponse>>,
    default: ScriptedResponse,
    calls: Mutex<Vec<String>>,
    last_request: Mutex<Option<CandleRequest>>,
}

impl MockCandleProvider {
    /// Unscripted ids answer HTTP 404
    pub fn new() -> Self {
        Self::with_default(ScriptedResponse::HttpStatus(404))
    }

    /// Every id answers with `status`
    pub fn failing(status: u16) -> Self {
        Self::with_default(ScriptedResponse::HttpStatus(status))
    }

    /// Every id answers with the same payload
    pub fn serving(response: CandleResponse) -> Self {
        Self::with_default(ScriptedResponse::Ok(response))
    }

    pub fn with_default(default: ScriptedResponse) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            default,
            calls: Mutex::new(Vec::new()),
            last_request: Mutex::new(None),
        }
    }

    pub fn script(&self, provider_id: &str, response: ScriptedResponse) {
        lock(&self.scripts).insert(provider_id.to_string(), response);
    }

    /// Provider ids requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn last_request(&self) -> Option<CandleRequest> {
        lock(&self.last_request).clone()
    }
}

impl Default for MockCandleProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CandleProvider for MockCandleProvider {
    async fn fetch_candles(
        &self,
        provider_id: &str,
        request: &CandleRequest,
    ) -> Result<CandleResponse, MarketDataError> {
        lock(&self.calls).push(provider_id.to_string());
        *lock(&self.last_request) = Some(request.clone());

        let scripted = lock(&self.scripts)
            .get(provider_id)
            .cloned()
            .unwrap_or_else(|| self.default.clone());
        debug!("MockCandleProvider: {} -> {}", provider_id, scripted_kind(&scripted));

        match scripted {
            ScriptedResponse::Ok(response) => Ok(response),
            ScriptedResponse::HttpStatus(status) => Err(MarketDataError::HttpStatus {
                provider: provider_id.to_string(),
                status,
            }),
            ScriptedResponse::NetworkError(reason) => Err(MarketDataError::Request {
                provider: provider_id.to_string(),
                reason,
            }),
            ScriptedResponse::Delayed(delay, response) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
        }
    }
}

fn scripted_kind(response: &ScriptedResponse) -> &'static str {
    match response {
        ScriptedResponse::Ok(_) => "ok",
        ScriptedResponse::HttpStatus(_) => "http status",
        ScriptedResponse::NetworkError(_) => "network error",
        ScriptedResponse::Delayed(..) => "delayed",
    }
}

#[derive(Debug, Clone)]
enum AdvisoryBehaviour {
    Unconfigured,
    Opinion(AdvisoryOpinion),
    Absent,
    Fail,
    Slow(Duration),
}

/// Advisory service with a fixed behaviour and a call counter
pub struct MockAdvisoryService {
    behaviour: AdvisoryBehaviour,
    calls: Mutex<usize>,
}

impl MockAdvisoryService {
    fn with(behaviour: AdvisoryBehaviour) -> Self {
        Self {
            behaviour,
            calls: Mutex::new(0),
        }
    }

    pub fn unconfigured() -> Self {
        Self::with(AdvisoryBehaviour::Unconfigured)
    }

    pub fn returning(opinion: AdvisoryOpinion) -> Self {
        Self::with(AdvisoryBehaviour::Opinion(opinion))
    }

    pub fn absent() -> Self {
        Self::with(AdvisoryBehaviour::Absent)
    }

    pub fn failing() -> Self {
        Self::with(AdvisoryBehaviour::Fail)
    }

    pub fn slow(delay: Duration) -> Self {
        Self::with(AdvisoryBehaviour::Slow(delay))
    }

    pub fn calls(&self) -> usize {
        *lock(&self.calls)
    }
}

#[async_trait]
impl AdvisoryService for MockAdvisoryService {
    fn is_configured(&self) -> bool {
        !matches!(self.behaviour, AdvisoryBehaviour::Unconfigured)
    }

    async fn opinion(
        &self,
        _context: &AdvisoryContext,
    ) -> Result<Option<AdvisoryOpinion>, AdvisoryError> {
        *lock(&self.calls) += 1;

        match &self.behaviour {
            AdvisoryBehaviour::Unconfigured => Err(AdvisoryError::NotConfigured),
            AdvisoryBehaviour::Opinion(opinion) => Ok(Some(opinion.clone())),
            AdvisoryBehaviour::Absent => Ok(None),
            AdvisoryBehaviour::Fail => Err(AdvisoryError::Request {
                reason: "connection reset".to_string(),
            }),
            AdvisoryBehaviour::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(None)
            }
        }
    }
}

/// Notifier that records every message
#[derive(Default)]
pub struct MockNotifier {
    messages: Mutex<Vec<String>>,
    fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn is_configured(&self) -> bool {
        true
    }

    async fn notify(&self, text: &str) -> Result<()> {
        if self.fail {
            anyhow::bail!("notification sink unavailable");
        }
        lock(&self.messages).push(text.to_string());
        Ok(())
    }
}
