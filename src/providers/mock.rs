/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with a tagged draft
 * - `MockProvider::flaky()` - Fails a fixed number of times, then succeeds
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::timing_out()` - Hangs for a while, then reports a timeout
 * - `MockProvider::slow()` - Succeeds after a delay
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{Provider, ProviderOutput};
use crate::translation::prompts::extract_source_text;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails the first `failures` calls, then succeeds
    FailFirst { failures: usize },
    /// Always fails with an error
    Failing,
    /// Waits `after_ms`, then fails with a timeout
    TimingOut { after_ms: u64 },
    /// Simulates a slow backend
    Slow { delay_ms: u64 },
}

/// Mock provider for testing orchestration behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Provider name reported in outputs
    name: String,
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter shared between clones
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str) -> String>,
    /// Usage reported on success
    usage_tokens: Option<u64>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(name: impl Into<String>, behavior: MockBehavior) -> Self {
        Self {
            name: name.into(),
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
            usage_tokens: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working(name: impl Into<String>) -> Self {
        Self::new(name, MockBehavior::Working)
    }

    /// Create a mock that fails `failures` times before succeeding
    pub fn flaky(name: impl Into<String>, failures: usize) -> Self {
        Self::new(name, MockBehavior::FailFirst { failures })
    }

    /// Create a failing mock provider that always errors
    pub fn failing(name: impl Into<String>) -> Self {
        Self::new(name, MockBehavior::Failing)
    }

    /// Create a mock that reports a timeout after `after_ms`
    pub fn timing_out(name: impl Into<String>, after_ms: u64) -> Self {
        Self::new(name, MockBehavior::TimingOut { after_ms })
    }

    /// Create a mock that succeeds after `delay_ms`
    pub fn slow(name: impl Into<String>, delay_ms: u64) -> Self {
        Self::new(name, MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator receiving the source text
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Report token usage on successful calls
    pub fn with_usage(mut self, usage_tokens: u64) -> Self {
        self.usage_tokens = Some(usage_tokens);
        self
    }

    /// Number of `generate` calls received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn draft(&self, prompt: &str) -> String {
        let source = extract_source_text(prompt);
        match self.custom_response {
            Some(generator) => generator(source),
            None => format!("[TH] {}", source),
        }
    }

    fn success(&self, prompt: &str, text: String) -> ProviderOutput {
        ProviderOutput {
            text,
            provider_name: self.name.clone(),
            raw_prompt: prompt.to_string(),
            usage_tokens: self.usage_tokens,
            cost_usd: None,
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
            usage_tokens: self.usage_tokens,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str) -> Result<ProviderOutput, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(self.success(prompt, self.draft(prompt))),

            MockBehavior::FailFirst { failures } => {
                if count < failures {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated transient failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.success(prompt, self.draft(prompt)))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::TimingOut { after_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(after_ms)).await;
                Err(ProviderError::Timeout(format!("no response within {}ms", after_ms)))
            }

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.success(prompt, self.draft(prompt)))
            }
        }
    }
}
