//! OpenAI-compatible chat completion used as the optional advisory opinion.

use crate::domain::errors::AdvisoryError;
use crate::domain::ports::{AdvisoryContext, AdvisoryService};
use crate::domain::signal::{Action, AdvisoryOpinion};
use crate::infrastructure::core::HttpClientFactory;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const SYSTEM_PROMPT: &str = "You are a forex analyst reviewing M5 technical indicators. \
Reply with a JSON object {\"action\": \"BUY\" | \"SELL\", \"confidence\": 0-100, \"reasoning\": string}.";

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawOpinion {
    action: String,
    confidence: f64,
    #[serde(default)]
    reasoning: String,
}

pub struct OpenAiAdvisoryService {
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: Client,
}

impl OpenAiAdvisoryService {
    pub fn new(api_key: Option<String>, base_url: String, model: String, timeout: Duration) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            client: HttpClientFactory::create_client(timeout),
        }
    }
}

/// Parse the model's JSON reply into an opinion, clamping confidence to 0..=100
pub fn parse_opinion(content: &str) -> Result<AdvisoryOpinion, AdvisoryError> {
    let raw: RawOpinion = serde_json::from_str(content.trim()).map_err(|e| AdvisoryError::Malformed {
        reason: e.to_string(),
    })?;

    let action: Action = raw.action.parse().map_err(|e: anyhow::Error| AdvisoryError::Malformed {
        reason: e.to_string(),
    })?;
    if !raw.confidence.is_finite() {
        return Err(AdvisoryError::Malformed {
            reason: "confidence is not a number".to_string(),
        });
    }

    Ok(AdvisoryOpinion {
        action,
        confidence: raw.confidence.round().clamp(0.0, 100.0) as u8,
        reasoning: raw.reasoning,
    })
}

#[async_trait]
impl AdvisoryService for OpenAiAdvisoryService {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn opinion(
        &self,
        context: &AdvisoryContext,
    ) -> Result<Option<AdvisoryOpinion>, AdvisoryError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AdvisoryError::NotConfigured);
        };

        let body = json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Pair: {}\nIndicators: {}\nTechnical score: {:+.2}",
                        context.pair, context.indicator_summary, context.technical_score
                    ),
                },
            ],
        });

        debug!("OpenAiAdvisory [{}]: requesting opinion", context.pair);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AdvisoryError::Request {
                reason: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisoryError::Request {
                reason: format!("HTTP status {}", status),
            });
        }

        let completion: ChatCompletion =
            response.json().await.map_err(|e| AdvisoryError::Malformed {
                reason: e.without_url().to_string(),
            })?;

        match completion.choices.into_iter().next().and_then(|c| c.message.content) {
            Some(content) => parse_opinion(&content).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_opinion() {
        let opinion =
            parse_opinion(r#"{"action": "sell", "confidence": 72.4, "reasoning": "lower highs"}"#).unwrap();
        assert_eq!(opinion.action, Action::Sell);
        assert_eq!(opinion.confidence, 72);
        assert_eq!(opinion.reasoning, "lower highs");
    }

    #[test]
    fn test_parse_opinion_clamps_confidence() {
        let opinion = parse_opinion(r#"{"action": "BUY/CALL", "confidence": 250}"#).unwrap();
        assert_eq!(opinion.action, Action::Buy);
        assert_eq!(opinion.confidence, 100);
    }

    #[test]
    fn test_parse_opinion_rejects_garbage() {
        assert!(matches!(
            parse_opinion("not json"),
            Err(AdvisoryError::Malformed { .. })
        ));
        assert!(matches!(
            parse_opinion(r#"{"action": "HOLD", "confidence": 50}"#),
            Err(AdvisoryError::Malformed { .. })
        ));
    }

    #[test]
    fn test_unconfigured_without_key() {
        let service = OpenAiAdvisoryService::new(
            None,
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_MODEL.to_string(),
            Duration::from_secs(1),
        );
        assert!(!service.is_configured());
    }
}
