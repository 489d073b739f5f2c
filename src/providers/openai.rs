use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Provider, ProviderOutput};
use crate::app_config::OpenAIConfig;
use crate::errors::ProviderError;

/// System turn sent with every completion request
pub const SYSTEM_PROMPT: &str = "You are a Thai localization expert.";

/// OpenAI client for interacting with the chat completions API
#[derive(Debug, Clone)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for bearer authentication
    api_key: String,
    /// API base URL, e.g. https://api.openai.com/v1
    endpoint: String,
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<OpenAIMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    /// Number of prompt tokens
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Number of completion tokens
    #[serde(default)]
    pub completion_tokens: u64,
    /// Total tokens billed for the call
    #[serde(default)]
    pub total_tokens: u64,
}

/// Message returned inside a choice; content may be null
#[derive(Debug, Deserialize)]
pub struct OpenAIResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Single completion choice
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIResponseMessage,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    /// Completion choices, first one is used
    pub choices: Vec<OpenAIChoice>,
    /// Token usage information
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

impl OpenAIRequest {
    /// Create a new chat completion request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl OpenAI {
    /// Create a new OpenAI client with a per-request timeout
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    /// Complete a chat request
    pub async fn complete(&self, request: &OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        response
            .json::<OpenAIResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Invalid OpenAI response: {}", e)))
    }

    /// Extract text from the first choice
    pub fn extract_text(response: &OpenAIResponse) -> Result<String, ProviderError> {
        let choice = response
            .choices
            .first()
            .ok_or_else(|| ProviderError::ParseError("OpenAI returned no choices".to_string()))?;

        Ok(choice.message.content.as_deref().unwrap_or_default().trim().to_string())
    }
}

/// Primary provider backed by OpenAI chat completions
#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    client: OpenAI,
    model: String,
    temperature: f32,
}

impl OpenAIProvider {
    pub const NAME: &'static str = "openai";

    /// Build the provider; fails when no API key is configured
    pub fn from_config(config: &OpenAIConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::MissingCredential("OpenAI API key missing".to_string()));
        }

        Ok(Self {
            client: OpenAI::new(
                config.api_key.clone(),
                config.endpoint.clone(),
                Duration::from_secs(config.timeout_secs),
            )?,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn generate(&self, prompt: &str) -> Result<ProviderOutput, ProviderError> {
        let request = OpenAIRequest::new(&self.model)
            .temperature(self.temperature)
            .add_message("system", SYSTEM_PROMPT)
            .add_message("user", prompt);

        let response = self.client.complete(&request).await?;
        let text = OpenAI::extract_text(&response)?;
        let usage_tokens = response.usage.as_ref().map(|usage| usage.total_tokens);
        debug!("OpenAI returned {} chars, usage {:?}", text.chars().count(), usage_tokens);

        Ok(ProviderOutput {
            text,
            provider_name: Self::NAME.to_string(),
            raw_prompt: prompt.to_string(),
            usage_tokens,
            cost_usd: None,
        })
    }
}
