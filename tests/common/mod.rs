/*!
 * Common test utilities for the leo test suite
 */

use anyhow::Result;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

use leo::app_config::{Config, FallbackProvider};
use leo::translation::{GlossaryTerm, InMemoryGlossary};

/// Route library logs to the test harness output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Glossary used across the suite
pub fn sample_glossary() -> Arc<InMemoryGlossary> {
    let store = InMemoryGlossary::with_terms(vec![
        GlossaryTerm::new("call to action", "ปุ่มกระตุ้น").sensitive(),
        GlossaryTerm::new("free shipping", "ส่งฟรี").with_part_of_speech("noun"),
        GlossaryTerm::new("brand", "แบรนด์"),
    ])
    .expect("sample glossary should be valid");
    Arc::new(store)
}

/// Configuration pointing both providers at a mock server with fast retries
pub fn config_for_server(server_uri: &str) -> Config {
    let mut config = Config::default();
    config.openai.api_key = "sk-test".to_string();
    config.openai.endpoint = format!("{}/v1", server_uri);
    config.openai.timeout_secs = 5;
    config.fallback_provider = FallbackProvider::GoogleTranslate;
    config.google_translate.api_key = "g-test".to_string();
    config.google_translate.endpoint = format!("{}/language/translate/v2", server_uri);
    config.google_translate.timeout_secs = 5;
    config.retry.backoff_base_ms = 1;
    config.retry.backoff_max_ms = 2;
    config
}

/// Chat completion body with a single choice
pub fn openai_completion(text: &str, total_tokens: u64) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }
        ],
        "usage": {
            "prompt_tokens": total_tokens / 2,
            "completion_tokens": total_tokens - total_tokens / 2,
            "total_tokens": total_tokens
        }
    })
}

/// Translate v2 body with a single translation
pub fn google_translation(text: &str) -> Value {
    json!({
        "data": {
            "translations": [ { "translatedText": text } ]
        }
    })
}
