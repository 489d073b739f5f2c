/*!
 * Retry and fallback across translation providers.
 *
 * Providers are tried in priority order. Each one gets a bounded number of
 * attempts with exponential backoff between them; the first success wins and
 * later providers are never called. When every provider is exhausted the
 * orchestrator returns `TranslationError::AllProvidersFailed`.
 */

use log::{debug, error, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{ProviderError, ProviderFailure, TranslationError};
use crate::providers::{Provider, ProviderOutput};

/// Bounded exponential backoff applied to each provider
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts per provider, including the first one
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub initial_backoff: Duration,
    /// Growth factor per failed attempt
    pub multiplier: f64,
    /// Upper bound for a single delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            multiplier: 2.0,
            max_backoff: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    /// Policy without delays, for tests and in-process providers
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            multiplier: 1.0,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay to wait after the `failed_attempt`-th failure (1-based)
    pub fn backoff(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1) as i32;
        let scaled = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = scaled.min(self.max_backoff.as_secs_f64());
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_backoff)
    }
}

/// Coordinates retries and fallback across an ordered provider list
#[derive(Debug)]
pub struct ProviderOrchestrator {
    providers: Vec<Arc<dyn Provider>>,
    policy: RetryPolicy,
}

impl ProviderOrchestrator {
    /// Create an orchestrator; `providers` is in priority order
    pub fn new(providers: Vec<Arc<dyn Provider>>, policy: RetryPolicy) -> Self {
        Self { providers, policy }
    }

    /// Names of the configured providers, in priority order
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Retry policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Generate a draft with the first provider that succeeds
    pub async fn generate(&self, prompt: &str) -> Result<ProviderOutput, TranslationError> {
        let mut failures = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            match self.attempt(provider.as_ref(), prompt).await {
                Ok(output) => return Ok(output),
                Err(failure) => {
                    error!(
                        "Provider {} exhausted {} attempts: {}",
                        failure.provider, failure.attempts, failure.error
                    );
                    failures.push(failure);
                }
            }
        }

        Err(TranslationError::AllProvidersFailed { failures })
    }

    async fn attempt(&self, provider: &dyn Provider, prompt: &str) -> Result<ProviderOutput, ProviderFailure> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error: Option<ProviderError> = None;

        for attempt in 1..=max_attempts {
            match provider.generate(prompt).await {
                Ok(output) => {
                    debug!("Provider {} succeeded on attempt {}/{}", provider.name(), attempt, max_attempts);
                    return Ok(output);
                }
                Err(e) => {
                    warn!(
                        "Provider {} failed on attempt {}/{}: {}",
                        provider.name(),
                        attempt,
                        max_attempts,
                        e
                    );
                    last_error = Some(e);
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.policy.backoff(attempt)).await;
            }
        }

        Err(ProviderFailure {
            provider: provider.name().to_string(),
            attempts: max_attempts,
            error: last_error.unwrap_or_else(|| {
                ProviderError::RequestFailed(format!("Provider {} exhausted retries", provider.name()))
            }),
        })
    }
}
