use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::translation::orchestrator::RetryPolicy;

/// Application configuration module
/// This module handles the localization core configuration including loading,
/// environment overrides, validation and saving.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Tone used when a request does not specify one
    #[serde(default = "default_tone")]
    pub default_tone: String,

    /// Terms that must be flagged when they appear in source or output text
    #[serde(default)]
    pub blocked_terms: Vec<String>,

    /// How long a glossary snapshot stays valid
    #[serde(default = "default_glossary_cache_ttl_secs")]
    pub glossary_cache_ttl_secs: u64,

    /// Primary generative provider
    #[serde(default)]
    pub openai: OpenAIConfig,

    /// Which literal translation backend to fall back to
    #[serde(default = "default_fallback_provider")]
    pub fallback_provider: FallbackProvider,

    /// Google Translate fallback provider
    #[serde(default)]
    pub google_translate: GoogleTranslateConfig,

    /// Retry policy shared by every provider
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Fallback provider selection
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackProvider {
    #[default]
    GoogleTranslate,
    #[serde(rename = "none")]
    Disabled,
}

impl std::str::FromStr for FallbackProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "google_translate" | "google" => Ok(Self::GoogleTranslate),
            "" | "none" | "disabled" => Ok(Self::Disabled),
            _ => Err(anyhow!("Invalid fallback provider: {}", s)),
        }
    }
}

/// OpenAI service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OpenAIConfig {
    /// API key; the provider is disabled when empty
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Model name (e.g., "gpt-4.1-mini")
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Service endpoint URL (for Azure OpenAI or self-hosted gateways)
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_openai_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_openai_model(),
            endpoint: default_openai_endpoint(),
            temperature: default_temperature(),
            timeout_secs: default_openai_timeout_secs(),
        }
    }
}

/// Google Translate service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GoogleTranslateConfig {
    /// API key passed as the `key` query parameter
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Translate v2 endpoint URL
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,

    /// Source language code
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Request timeout in seconds
    #[serde(default = "default_google_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GoogleTranslateConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_google_endpoint(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            timeout_secs: default_google_timeout_secs(),
        }
    }
}

/// Retry settings applied to each provider individually
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RetryConfig {
    /// Attempts per provider, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay after the first failed attempt in milliseconds
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Growth factor applied to the delay after each failure
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Upper bound for a single delay in milliseconds
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

fn default_tone() -> String {
    "professional".to_string()
}

fn default_glossary_cache_ttl_secs() -> u64 {
    300
}

fn default_fallback_provider() -> FallbackProvider {
    FallbackProvider::GoogleTranslate
}

fn default_openai_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_openai_timeout_secs() -> u64 {
    30
}

fn default_google_endpoint() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "th".to_string()
}

fn default_google_timeout_secs() -> u64 {
    20
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    500
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_backoff_max_ms() -> u64 {
    4000
}

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "LEO_";

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Apply `LEO_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using an arbitrary variable lookup
    ///
    /// Keys are looked up with the `LEO_` prefix, e.g. `LEO_OPENAI_API_KEY`.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(value) = var("OPENAI_API_KEY") {
            self.openai.api_key = value;
        }
        if let Some(value) = var("OPENAI_MODEL") {
            self.openai.model = value;
        }
        if let Some(value) = var("OPENAI_TEMPERATURE") {
            self.openai.temperature = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid LEO_OPENAI_TEMPERATURE: {}", value))?;
        }
        if let Some(value) = var("GOOGLE_TRANSLATE_API_KEY") {
            self.google_translate.api_key = value;
        }
        if let Some(value) = var("FALLBACK_TRANSLATION_PROVIDER") {
            self.fallback_provider = value.parse()?;
        }
        if let Some(value) = var("DEFAULT_TONE") {
            self.default_tone = value;
        }
        if let Some(value) = var("BLOCKED_TERMS") {
            self.blocked_terms = parse_term_list(&value)?;
        }
        if let Some(value) = var("GLOSSARY_CACHE_TTL_SECS") {
            self.glossary_cache_ttl_secs = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid LEO_GLOSSARY_CACHE_TTL_SECS: {}", value))?;
        }

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.default_tone.trim().is_empty() {
            return Err(anyhow!("Default tone cannot be empty"));
        }

        if !(0.0..=2.0).contains(&self.openai.temperature) {
            return Err(anyhow!(
                "OpenAI temperature must be between 0.0 and 2.0, got {}",
                self.openai.temperature
            ));
        }

        Url::parse(&self.openai.endpoint)
            .with_context(|| format!("Invalid OpenAI endpoint: {}", self.openai.endpoint))?;
        Url::parse(&self.google_translate.endpoint).with_context(|| {
            format!("Invalid Google Translate endpoint: {}", self.google_translate.endpoint)
        })?;

        if self.openai.timeout_secs == 0 || self.google_translate.timeout_secs == 0 {
            return Err(anyhow!("Provider timeouts must be greater than zero"));
        }

        if self.retry.max_attempts == 0 {
            return Err(anyhow!("Retry max_attempts must be at least 1"));
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(anyhow!(
                "Retry backoff_multiplier must be at least 1.0, got {}",
                self.retry.backoff_multiplier
            ));
        }
        if self.retry.backoff_base_ms > self.retry.backoff_max_ms {
            return Err(anyhow!(
                "Retry backoff_base_ms ({}) exceeds backoff_max_ms ({})",
                self.retry.backoff_base_ms,
                self.retry.backoff_max_ms
            ));
        }

        Ok(())
    }

    /// Retry policy derived from the retry section
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            initial_backoff: Duration::from_millis(self.retry.backoff_base_ms),
            multiplier: self.retry.backoff_multiplier,
            max_backoff: Duration::from_millis(self.retry.backoff_max_ms),
        }
    }

    /// Glossary snapshot lifetime
    pub fn glossary_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.glossary_cache_ttl_secs)
    }
}

/// Parse a blocked-term list given either as JSON array or comma-separated text
fn parse_term_list(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        let terms: Vec<String> = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid JSON term list: {}", trimmed))?;
        return Ok(terms.into_iter().filter(|t| !t.trim().is_empty()).collect());
    }

    Ok(trimmed
        .split(',')
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty())
        .collect())
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            default_tone: default_tone(),
            blocked_terms: Vec::new(),
            glossary_cache_ttl_secs: default_glossary_cache_ttl_secs(),
            openai: OpenAIConfig::default(),
            fallback_provider: default_fallback_provider(),
            google_translate: GoogleTranslateConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}
