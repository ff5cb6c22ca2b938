use super::composer::SignalComposer;
use super::fallback::fallback_signal;
use super::indicator_set::compute_indicators;
use super::policy::SignalPolicy;
use super::scorer::{ConfluenceScorer, describe};
use crate::application::market_data::PriceHistorySource;
use crate::domain::errors::IndicatorError;
use crate::domain::market::{CandleSeries, CurrencyPair};
use crate::domain::ports::{AdvisoryContext, AdvisoryService, RandomSource};
use crate::domain::signal::{AdvisoryOpinion, Signal};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const DEFAULT_ADVISORY_TIMEOUT: Duration = Duration::from_secs(10);

/// Source -> indicators -> scorer -> composer, with a fallback signal on any failure.
///
/// Holds no per-call state: concurrent calls for the same or different pairs
/// do not interact.
pub struct SignalGenerator {
    source: PriceHistorySource,
    policy: Arc<SignalPolicy>,
    scorer: ConfluenceScorer,
    composer: SignalComposer,
    random: Arc<dyn RandomSource>,
    advisory: Option<Arc<dyn AdvisoryService>>,
    advisory_timeout: Duration,
}

impl SignalGenerator {
    pub fn new(
        source: PriceHistorySource,
        policy: SignalPolicy,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let policy = Arc::new(policy);
        Self {
            source,
            scorer: ConfluenceScorer::new(policy.clone()),
            composer: SignalComposer::new(policy.clone()),
            policy,
            random,
            advisory: None,
            advisory_timeout: DEFAULT_ADVISORY_TIMEOUT,
        }
    }

    pub fn with_advisory(mut self, service: Arc<dyn AdvisoryService>, timeout: Duration) -> Self {
        self.advisory = Some(service);
        self.advisory_timeout = timeout;
        self
    }

    pub fn policy(&self) -> &SignalPolicy {
        &self.policy
    }

    /// Always returns a signal; failures degrade to the fallback signal.
    pub async fn generate(&self, pair: &str, is_manual: bool) -> Signal {
        self.generate_at(&CurrencyPair::new(pair), is_manual, Utc::now())
            .await
    }

    pub async fn generate_at(
        &self,
        pair: &CurrencyPair,
        is_manual: bool,
        now: DateTime<Utc>,
    ) -> Signal {
        match self.run(pair, is_manual, now).await {
            Ok(signal) => {
                info!(
                    "SignalGenerator [{}]: {} {} @ {} (SL {}, TP {}), confidence {}%, {}",
                    pair,
                    signal.tier,
                    signal.action,
                    signal.entry_price,
                    signal.stop_loss,
                    signal.take_profit,
                    signal.confidence,
                    signal.window().start_label()
                );
                signal
            }
            Err(e) => {
                error!(
                    "SignalGenerator [{}]: pipeline failed, returning fallback signal: {:#}",
                    pair, e
                );
                fallback_signal(pair, is_manual, now, &self.policy, &mut self.random.rng())
            }
        }
    }

    async fn run(&self, pair: &CurrencyPair, is_manual: bool, now: DateTime<Utc>) -> Result<Signal> {
        let series = self.source.fetch_at(pair, now.timestamp()).await?;
        let signal = self.signal_from_series(&series, is_manual, now).await?;
        Ok(signal)
    }

    /// Everything after acquisition; deterministic for a given series when
    /// no advisory opinion is returned.
    pub async fn signal_from_series(
        &self,
        series: &CandleSeries,
        is_manual: bool,
        now: DateTime<Utc>,
    ) -> Result<Signal, IndicatorError> {
        let set = compute_indicators(series, &self.policy.indicators)?;
        debug!("SignalGenerator [{}]: {}", series.pair, set.summary());

        let technical: f64 = self.scorer.contributions(&set).iter().map(|c| c.value).sum();
        let context = AdvisoryContext {
            pair: series.pair.clone(),
            indicator_summary: set.summary(),
            technical_score: technical,
        };
        let opinion = self.advisory_opinion(&context).await;

        let score = self.scorer.score(&set, opinion.as_ref());
        debug!("SignalGenerator [{}]: {}", series.pair, describe(&score));
        Ok(self
            .composer
            .compose_at(&series.pair, &set, &score, is_manual, now))
    }

    /// Absent, misconfigured, failing and slow services all yield `None`
    async fn advisory_opinion(&self, context: &AdvisoryContext) -> Option<AdvisoryOpinion> {
        let service = self.advisory.as_ref()?;
        if !service.is_configured() {
            debug!(
                "SignalGenerator [{}]: advisory service not configured, skipping",
                context.pair
            );
            return None;
        }

        match tokio::time::timeout(self.advisory_timeout, service.opinion(context)).await {
            Ok(Ok(Some(mut opinion))) => {
                opinion.confidence = opinion.confidence.min(100);
                debug!(
                    "SignalGenerator [{}]: advisory {} {}%",
                    context.pair, opinion.action, opinion.confidence
                );
                Some(opinion)
            }
            Ok(Ok(None)) => None,
            Ok(Err(e)) => {
                warn!("SignalGenerator [{}]: advisory ignored: {}", context.pair, e);
                None
            }
            Err(_) => {
                warn!(
                    "SignalGenerator [{}]: advisory timed out after {:?}",
                    context.pair, self.advisory_timeout
                );
                None
            }
        }
    }
}
