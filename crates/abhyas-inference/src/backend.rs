//! OpenAI-compatible reasoning-service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use abhyas_core::{defaults, ChatRole, ChatTurn, Error, ReasoningBackend, ResponseFormat, Result};

use crate::types::*;

/// Default reasoning-service endpoint.
pub const DEFAULT_REASONING_URL: &str = "https://api.openai.com/v1";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the reasoning-service client.
#[derive(Debug, Clone)]
pub struct ReasoningConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// Bearer credential. Unset means the enrichment features degrade
    /// silently; no call is ever attempted without it.
    pub api_key: Option<String>,
    /// Model to use for completions.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REASONING_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: defaults::REASONING_TIMEOUT_SECS,
        }
    }
}

/// Reasoning-service client implementing [`ReasoningBackend`].
pub struct ReasoningClient {
    client: Client,
    config: ReasoningConfig,
}

impl ReasoningClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ReasoningConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            configured = config.api_key.is_some(),
            "Initializing reasoning client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `REASONING_BASE_URL` | `https://api.openai.com/v1` | API endpoint |
    /// | `REASONING_API_KEY` | unset | Bearer credential |
    /// | `REASONING_MODEL` | `gpt-4o-mini` | Completion model |
    /// | `REASONING_TIMEOUT` | `120` | Request timeout (seconds) |
    pub fn from_env() -> Result<Self> {
        let config = ReasoningConfig {
            base_url: std::env::var("REASONING_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_REASONING_URL.to_string()),
            api_key: std::env::var("REASONING_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            model: std::env::var("REASONING_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout_seconds: std::env::var("REASONING_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::REASONING_TIMEOUT_SECS),
        };

        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ReasoningConfig {
        &self.config
    }

    /// Probe the service with a minimal models-list request.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/models", self.config.base_url.trim_end_matches('/'));
        let mut req = self.client.get(&url).timeout(Duration::from_secs(5));
        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        match req.send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(status = %resp.status(), "Reasoning service health check failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "Reasoning service health check error");
                false
            }
        }
    }
}

fn role_str(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
    }
}

#[async_trait]
impl ReasoningBackend for ReasoningClient {
    async fn complete(
        &self,
        system: &str,
        turns: &[ChatTurn],
        format: ResponseFormat,
    ) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| Error::Config("Reasoning credential not configured".to_string()))?;

        let mut messages = Vec::with_capacity(turns.len() + 1);
        if !system.is_empty() {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        for turn in turns {
            messages.push(WireMessage {
                role: role_str(turn.role).to_string(),
                content: turn.content.clone(),
            });
        }

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            response_format: match format {
                ResponseFormat::Json => Some(WireResponseFormat::json_object()),
                ResponseFormat::Text => None,
            },
        };

        debug!(
            model = %self.config.model,
            turns = turns.len(),
            ?format,
            "Reasoning completion request"
        );

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: ServiceErrorResponse = response
                .json()
                .await
                .unwrap_or_else(|_| ServiceErrorResponse::unknown());
            return Err(Error::Inference(format!(
                "Reasoning service returned {}: {}",
                status, body.error.message
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        debug!(response_len = content.len(), "Reasoning completion done");
        Ok(content)
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}
