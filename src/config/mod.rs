//! Configuration module for fxsignals.
//!
//! Structured configuration loading from environment variables, organized by
//! concern: Provider, Advisory, Notifier, Scheduler, plus the optional signal
//! policy file.

mod advisory_config;
mod notifier_config;
mod provider_config;
mod scheduler_config;

pub use advisory_config::AdvisoryEnvConfig;
pub use notifier_config::NotifierEnvConfig;
pub use provider_config::ProviderEnvConfig;
pub use scheduler_config::SchedulerEnvConfig;

use crate::application::signals::SignalPolicy;
use anyhow::{Context, Result};
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub provider: ProviderEnvConfig,
    pub advisory: AdvisoryEnvConfig,
    pub notifier: NotifierEnvConfig,
    pub scheduler: SchedulerEnvConfig,
    pub policy: SignalPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `SIGNAL_POLICY_FILE`, when set, must point at a readable TOML policy;
    /// otherwise the built-in policy is used.
    pub fn from_env() -> Result<Self> {
        let policy = match env::var("SIGNAL_POLICY_FILE") {
            Ok(path) if !path.trim().is_empty() => {
                SignalPolicy::from_file(path.trim()).context("Failed to load signal policy")?
            }
            _ => SignalPolicy::default(),
        };

        Ok(Self {
            provider: ProviderEnvConfig::from_env(),
            advisory: AdvisoryEnvConfig::from_env(),
            notifier: NotifierEnvConfig::from_env(),
            scheduler: SchedulerEnvConfig::from_env(),
            policy,
        })
    }
}
