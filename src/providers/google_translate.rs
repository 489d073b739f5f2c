use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Provider, ProviderOutput};
use crate::app_config::GoogleTranslateConfig;
use crate::errors::ProviderError;
use crate::translation::prompts::extract_source_text;

/// Google Translate v2 client
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// API key sent as the `key` query parameter
    api_key: String,
    /// Translate v2 endpoint URL
    endpoint: String,
}

/// Translate request body
#[derive(Debug, Serialize)]
pub struct TranslateRequest {
    /// Text to translate
    q: String,
    /// Target language code
    target: String,
    /// Source language code
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    /// Input format, always plain text here
    format: String,
}

/// Single translation returned by the API
#[derive(Debug, Deserialize)]
pub struct TranslatedText {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

/// Payload wrapper of a translate response
#[derive(Debug, Default, Deserialize)]
pub struct TranslateData {
    #[serde(default)]
    pub translations: Vec<TranslatedText>,
}

/// Translate response
#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub data: TranslateData,
}

impl TranslateRequest {
    /// Create a plain-text translation request
    pub fn new(text: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            q: text.into(),
            target: target.into(),
            source: None,
            format: "text".to_string(),
        }
    }

    /// Pin the source language instead of letting the service detect it
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl GoogleTranslate {
    /// Create a new client with a per-request timeout
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

    /// Translate text and return the first translation
    pub async fn translate(&self, request: &TranslateRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google Translate API error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let body = response
            .json::<TranslateResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Invalid Google Translate response: {}", e)))?;

        body.data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| ProviderError::ParseError("Google Translate returned no translations".to_string()))
    }
}

/// Fallback provider producing a literal translation of the prompt's source text
#[derive(Debug, Clone)]
pub struct GoogleTranslateProvider {
    client: GoogleTranslate,
    source_language: String,
    target_language: String,
}

impl GoogleTranslateProvider {
    pub const NAME: &'static str = "google_translate";

    /// Build the provider; fails when no API key is configured
    pub fn from_config(config: &GoogleTranslateConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::MissingCredential(
                "Google Translate API key missing".to_string(),
            ));
        }

        Ok(Self {
            client: GoogleTranslate::new(
                config.api_key.clone(),
                config.endpoint.clone(),
                Duration::from_secs(config.timeout_secs),
            )?,
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
        })
    }
}

#[async_trait]
impl Provider for GoogleTranslateProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn generate(&self, prompt: &str) -> Result<ProviderOutput, ProviderError> {
        // The styled instruction is useless to a literal translator; only the source text is sent
        let source_text = extract_source_text(prompt);
        let request = TranslateRequest::new(source_text, &self.target_language)
            .source(&self.source_language);

        let text = self.client.translate(&request).await?;
        debug!("Google Translate returned {} chars", text.chars().count());

        Ok(ProviderOutput {
            text,
            provider_name: Self::NAME.to_string(),
            raw_prompt: prompt.to_string(),
            usage_tokens: None,
            cost_usd: None,
        })
    }
}
