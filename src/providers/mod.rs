/*!
 * Provider implementations for the translation backends.
 *
 * This module contains client implementations for the supported services:
 * - OpenAI: primary generative backend (chat completions)
 * - Google Translate: fallback literal machine translation
 * - Mock: scripted in-process backend for tests and local runs
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Result of one successful provider call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderOutput {
    /// Generated Thai text
    pub text: String,

    /// Name of the provider that produced the text
    pub provider_name: String,

    /// Prompt the provider was called with
    pub raw_prompt: String,

    /// Tokens consumed, when the backend reports them
    pub usage_tokens: Option<u64>,

    /// Cost of the call in USD, when known
    pub cost_usd: Option<f64>,
}

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing the orchestrator to hold them interchangeably in priority order.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Stable identifier used for provenance and provider-set identity
    fn name(&self) -> &str;

    /// Produce a Thai draft for the supplied prompt
    ///
    /// # Arguments
    /// * `prompt` - The full instruction built by the prompt module
    ///
    /// # Returns
    /// * `Result<ProviderOutput, ProviderError>` - The draft or the failure of this single call
    async fn generate(&self, prompt: &str) -> Result<ProviderOutput, ProviderError>;
}

pub mod google_translate;
pub mod mock;
pub mod openai;

pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockBehavior, MockProvider};
pub use openai::OpenAIProvider;
