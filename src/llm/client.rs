use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::gateway::{GatewayError, GatewayFuture, ModelGateway};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_TEMPERATURE: f64 = 0.1;
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Configuration for the Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: String,
    /// Model to use (e.g., "claude-sonnet-4-20250514")
    pub model: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl AnthropicConfig {
    /// Create config from environment variables.
    ///
    /// `ANTHROPIC_API_KEY` is required; `COACHLENS_MODEL`,
    /// `COACHLENS_MAX_TOKENS` and `COACHLENS_TEMPERATURE` override defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable not set")?;

        let mut config = Self::new(api_key, DEFAULT_MODEL.to_string());

        if let Some(model) = optional_env("COACHLENS_MODEL") {
            config.model = model;
        }
        if let Some(raw) = optional_env("COACHLENS_MAX_TOKENS") {
            config.max_tokens = raw
                .parse()
                .with_context(|| format!("Invalid COACHLENS_MAX_TOKENS: {raw}"))?;
        }
        if let Some(raw) = optional_env("COACHLENS_TEMPERATURE") {
            config.temperature = raw
                .parse()
                .with_context(|| format!("Invalid COACHLENS_TEMPERATURE: {raw}"))?;
        }

        Ok(config)
    }

    /// Create with custom settings
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Anthropic API client
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a single user prompt and return the first text block
    pub async fn send_message(&self, prompt: &str) -> Result<String, GatewayError> {
        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        debug!(
            "Sending {} prompt chars to {}",
            prompt.len(),
            self.config.model
        );

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::BackendUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let response: AnthropicResponse = response.json().await.map_err(|e| {
            GatewayError::BackendUnavailable(format!("Failed to parse API response: {e}"))
        })?;

        response
            .content
            .into_iter()
            .find(|c| c.content_type == "text")
            .map(|c| c.text)
            .ok_or_else(|| {
                GatewayError::BackendUnavailable("No text content in response".to_string())
            })
    }
}

impl ModelGateway for AnthropicClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> GatewayFuture<'a> {
        Box::pin(self.send_message(prompt))
    }
}

/// Map a non-success HTTP status onto the gateway error taxonomy
fn classify_status(status: StatusCode, body: String) -> GatewayError {
    let detail = format!("{status} - {body}");
    if status == StatusCode::TOO_MANY_REQUESTS {
        GatewayError::RateLimited(detail)
    } else if status.is_client_error() {
        GatewayError::InvalidRequest(detail)
    } else {
        GatewayError::BackendUnavailable(detail)
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}
