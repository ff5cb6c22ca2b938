use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::application::market_data::PriceHistorySource;
use crate::application::scheduler::AutoModeScheduler;
use crate::application::signals::SignalGenerator;
use crate::config::Config;
use crate::domain::ports::{CandleProvider, Notifier, RandomSource};
use crate::domain::repositories::{SettingsRepository, SignalRepository};
use crate::infrastructure::{
    EntropyRandomSource, FinnhubCandleProvider, InMemorySettingsRepository,
    InMemorySignalRepository, LogNotifier, OpenAiAdvisoryService, TelegramNotifier,
};

pub struct ServicesHandle {
    pub generator: Arc<SignalGenerator>,
    pub signal_repository: Arc<dyn SignalRepository>,
    pub settings_repository: Arc<dyn SettingsRepository>,
    pub notifier: Arc<dyn Notifier>,
}

impl ServicesHandle {
    pub fn scheduler(&self, config: &Config) -> AutoModeScheduler {
        AutoModeScheduler::new(
            self.generator.clone(),
            self.signal_repository.clone(),
            self.settings_repository.clone(),
            self.notifier.clone(),
        )
        .with_tick(config.scheduler.tick())
    }
}

pub struct ServicesBootstrap;

impl ServicesBootstrap {
    pub fn init(config: &Config) -> Result<ServicesHandle> {
        let random: Arc<dyn RandomSource> = Arc::new(EntropyRandomSource);

        // 1. Price history acquisition
        let finnhub = FinnhubCandleProvider::new(
            config.provider.finnhub_api_key.clone(),
            config.provider.finnhub_base_url.clone(),
            config.provider.timeout(),
        );
        if !finnhub.is_configured() {
            info!("ServicesBootstrap: FINNHUB_API_KEY not set, signals will use synthetic history");
        }
        let provider: Arc<dyn CandleProvider> = Arc::new(finnhub);
        let source = PriceHistorySource::new(
            provider,
            config.provider.catalog(),
            random.clone(),
            config.provider.price_history_settings(),
        );

        // 2. Generator, with the advisory service only when a key is present
        let mut generator = SignalGenerator::new(source, config.policy.clone(), random);
        if config.advisory.is_configured() {
            info!(
                "ServicesBootstrap: advisory enabled (model {})",
                config.advisory.model
            );
            generator = generator.with_advisory(
                Arc::new(OpenAiAdvisoryService::new(
                    config.advisory.api_key.clone(),
                    config.advisory.base_url.clone(),
                    config.advisory.model.clone(),
                    config.advisory.timeout(),
                )),
                config.advisory.timeout(),
            );
        }

        // 3. Persistence and notification collaborators
        let notifier: Arc<dyn Notifier> = if config.notifier.telegram_configured() {
            Arc::new(TelegramNotifier::new(
                config.notifier.telegram_bot_token.clone(),
                config.notifier.telegram_chat_id.clone(),
            ))
        } else {
            Arc::new(LogNotifier)
        };
        let settings = config
            .scheduler
            .initial_settings(config.notifier.telegram_chat_id.clone());

        Ok(ServicesHandle {
            generator: Arc::new(generator),
            signal_repository: Arc::new(InMemorySignalRepository::new()),
            settings_repository: Arc::new(InMemorySettingsRepository::new(settings)),
            notifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_config_wiring() {
        let config = Config::default();
        let services = ServicesBootstrap::init(&config).unwrap();

        assert_eq!(services.generator.policy(), &config.policy);
        let settings = services.settings_repository.get().await.unwrap();
        assert_eq!(settings.active_pairs.len(), 3);
        assert!(!settings.is_auto_mode);
    }
}
