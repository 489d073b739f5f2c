/*!
 * Error types for the leo localization core.
 *
 * This module contains custom error types for the different layers of the
 * translation pipeline, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when calling a single provider backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The outbound request exceeded the provider timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider cannot be built because its credential is absent
    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

impl ProviderError {
    /// Map a non-success HTTP status into the matching provider error
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Last error recorded for a provider the orchestrator gave up on
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFailure {
    /// Provider name
    pub provider: String,
    /// Number of attempts made before giving up
    pub attempts: u32,
    /// Error from the final attempt
    pub error: ProviderError,
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.provider, self.error)
    }
}

fn join_failures(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(|failure| failure.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur during translation orchestration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// Every configured provider exhausted its retries
    #[error("All translation providers failed: {}", join_failures(.failures))]
    AllProvidersFailed {
        /// One entry per provider, in priority order
        failures: Vec<ProviderFailure>,
    },
}

/// Errors raised by the glossary source, store, and cache
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GlossaryError {
    /// The authoritative glossary source could not be read
    #[error("Glossary source unavailable: {0}")]
    SourceUnavailable(String),

    /// A term with the same source term already exists
    #[error("Duplicate source term: {0}")]
    DuplicateSourceTerm(String),

    /// No term exists for the given source term
    #[error("Glossary term not found: {0}")]
    TermNotFound(String),

    /// The term failed validation
    #[error("Invalid glossary term: {0}")]
    InvalidTerm(String),
}

/// Errors surfaced by the controller to application callers
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration loading or validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the glossary layer
    #[error("Glossary error: {0}")]
    Glossary(#[from] GlossaryError),
}
