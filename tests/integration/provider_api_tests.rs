/*!
 * Integration tests for provider API interactions against a mock HTTP server
 */

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use leo::app_config::{GoogleTranslateConfig, OpenAIConfig};
use leo::errors::ProviderError;
use leo::providers::openai::SYSTEM_PROMPT;
use leo::providers::{GoogleTranslateProvider, OpenAIProvider, Provider};
use leo::translation::build_translation_prompt;
use crate::common;

fn openai_config(server: &MockServer) -> OpenAIConfig {
    OpenAIConfig {
        api_key: "sk-test".to_string(),
        endpoint: format!("{}/v1", server.uri()),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn google_config(server: &MockServer) -> GoogleTranslateConfig {
    GoogleTranslateConfig {
        api_key: "g-test".to_string(),
        endpoint: format!("{}/language/translate/v2", server.uri()),
        timeout_secs: 5,
        ..Default::default()
    }
}

/// Test the OpenAI provider sends bearer auth and both chat turns
#[tokio::test]
async fn test_openai_generate_withValidResponse_shouldReturnTrimmedTextAndUsage() {
    common::init_logging();
    let server = MockServer::start().await;
    let prompt = build_translation_prompt("Hello", "friendly", None, None, &[]);

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4.1-mini",
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::openai_completion("  สวัสดี \n", 57)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAIProvider::from_config(&openai_config(&server)).unwrap();
    let output = provider.generate(&prompt).await.unwrap();

    assert_eq!(output.text, "สวัสดี");
    assert_eq!(output.provider_name, "openai");
    assert_eq!(output.raw_prompt, prompt);
    assert_eq!(output.usage_tokens, Some(57));
    assert_eq!(output.cost_usd, None);
}

/// Test an authentication failure maps to the dedicated error
#[tokio::test]
async fn test_openai_generate_withUnauthorized_shouldMapToAuthenticationError() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let provider = OpenAIProvider::from_config(&openai_config(&server)).unwrap();
    let error = provider.generate("prompt").await.unwrap_err();

    assert_eq!(error, ProviderError::AuthenticationError("invalid api key".to_string()));
}

/// Test a malformed body is a parse error
#[tokio::test]
async fn test_openai_generate_withMalformedBody_shouldFailToParse() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let provider = OpenAIProvider::from_config(&openai_config(&server)).unwrap();
    let error = provider.generate("prompt").await.unwrap_err();

    assert!(matches!(error, ProviderError::ParseError(_)));
}

/// Test the Google provider sends only the source text and the key as query parameter
#[tokio::test]
async fn test_google_generate_shouldTranslateOnlySourceText() {
    let server = MockServer::start().await;
    let prompt = build_translation_prompt("Free shipping today", "urgent", Some("shoppers"), None, &[]);

    Mock::given(method("POST"))
        .and(path("/language/translate/v2"))
        .and(query_param("key", "g-test"))
        .and(body_partial_json(json!({
            "q": "Free shipping today",
            "target": "th",
            "source": "en",
            "format": "text"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::google_translation("ส่งฟรีวันนี้")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GoogleTranslateProvider::from_config(&google_config(&server)).unwrap();
    let output = provider.generate(&prompt).await.unwrap();

    assert_eq!(output.text, "ส่งฟรีวันนี้");
    assert_eq!(output.provider_name, "google_translate");
    assert_eq!(output.usage_tokens, None);
}

/// Test an empty translation list is a parse error
#[tokio::test]
async fn test_google_generate_withNoTranslations_shouldFailToParse() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/language/translate/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "translations": [] } })))
        .mount(&server)
        .await;

    let provider = GoogleTranslateProvider::from_config(&google_config(&server)).unwrap();
    let error = provider.generate("Content to adapt:\nHello").await.unwrap_err();

    assert!(matches!(error, ProviderError::ParseError(_)));
}

/// Test rate limiting maps to the dedicated error
#[tokio::test]
async fn test_google_generate_withTooManyRequests_shouldMapToRateLimit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let provider = GoogleTranslateProvider::from_config(&google_config(&server)).unwrap();
    let error = provider.generate("Content to adapt:\nHello").await.unwrap_err();

    assert_eq!(error, ProviderError::RateLimitExceeded("quota exceeded".to_string()));
}

/// Test a response slower than the configured timeout surfaces as a timeout
#[tokio::test]
async fn test_openai_generate_withSlowResponse_shouldTimeOut() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::openai_completion("ช้าเกินไป", 10))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = OpenAIConfig {
        timeout_secs: 1,
        ..openai_config(&server)
    };
    let provider = OpenAIProvider::from_config(&config).unwrap();
    let error = provider.generate("prompt").await.unwrap_err();

    assert!(matches!(error, ProviderError::Timeout(_)), "unexpected error: {:?}", error);
}
