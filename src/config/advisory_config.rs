//! Advisory (OpenAI-compatible) configuration parsing from environment variables.

use crate::infrastructure::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AdvisoryEnvConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for AdvisoryEnvConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl AdvisoryEnvConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("AI_INTEGRATIONS_OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            base_url: env::var("AI_INTEGRATIONS_OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: env::var("ADVISORY_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout_secs: env::var("ADVISORY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u64>()
                .unwrap_or(10),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
