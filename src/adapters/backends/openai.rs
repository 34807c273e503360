//! OpenAI-compatible chat completions backend.
//!
//! Sends the rendered prompt as a single user message after a fixed system
//! message, forwarding the arm's temperature, top_p and max_tokens.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::errors::GenerationError;
use crate::domain::models::{BackendConfig, Generation, Params, Usage};
use crate::domain::ports::GenerationBackend;

/// Configuration for the OpenAI backend.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key (read from OPENAI_API_KEY when not set)
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Model name
    pub model: String,
    /// System message
    pub system_prompt: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self::from(&BackendConfig::default())
    }
}

impl From<&BackendConfig> for OpenAiConfig {
    fn from(config: &BackendConfig) -> Self {
        Self {
            api_key: config.resolve_api_key(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

impl OpenAiConfig {
    /// Create config with explicit API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Create config with custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Chat-completions backend over HTTP.
pub struct OpenAiBackend {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiBackend {
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                GenerationError::NotConfigured(format!("Failed to create HTTP client: {e}"))
            })?;
        Ok(Self { config, client })
    }

    fn build_request<'a>(&'a self, prompt: &'a str, params: &Params) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: params.temperature,
            top_p: params.top_p,
            max_tokens: params.max_tokens,
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    fn backend_id(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str, params: &Params) -> Result<Generation, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::NotConfigured("OPENAI_API_KEY not set".to_string()))?;

        debug!(model = %self.config.model, temperature = params.temperature, "sending chat completion");

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(api_key)
            .json(&self.build_request(prompt, params))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.config.timeout_secs.saturating_mul(1000))
                } else {
                    GenerationError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GenerationError::InvalidResponse("response has no choices".to_string()))?;

        let usage = parsed.usage.unwrap_or_default();
        debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "chat completion received"
        );

        Ok(Generation::new(
            text.trim(),
            Usage::new(usage.prompt_tokens, usage.completion_tokens),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_forwards_params() {
        let backend = OpenAiBackend::new(OpenAiConfig::default().with_api_key("k")).unwrap();
        let params = Params::new(0.4, 128, 0.9);
        let body = serde_json::to_value(backend.build_request("Capital of France?", &params)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Capital of France?");
        assert_eq!(body["temperature"], 0.4);
        assert_eq!(body["top_p"], 0.9);
        assert_eq!(body["max_tokens"], 128);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_not_configured() {
        let mut config = OpenAiConfig::default();
        config.api_key = None;
        let backend = OpenAiBackend::new(config).unwrap();
        let err = backend.generate("hi", &Params::default()).await.unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured(_)));
    }
}
