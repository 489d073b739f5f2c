/*!
 * End-to-end translation tests through the controller
 */

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use leo::app_config::{Config, FallbackProvider};
use leo::translation::{InMemoryGlossary, PLACEHOLDER_PROVIDER};
use leo::Controller;
use crate::common;

async fn mount_openai(server: &MockServer, status: u16, text: &str) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(common::openai_completion(text, 120))
    } else {
        ResponseTemplate::new(status).set_body_string(text)
    };
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(template)
        .mount(server)
        .await;
}

/// Test the primary provider result carries glossary and provenance data
#[tokio::test]
async fn test_translate_withHealthyPrimary_shouldUseOpenAI() {
    common::init_logging();
    let server = MockServer::start().await;
    mount_openai(&server, 200, "ส่งฟรีสำหรับแบรนด์ของเรา").await;

    let controller = Controller::new(common::config_for_server(&server.uri()), common::sample_glossary()).unwrap();
    let result = controller
        .translate("Free shipping for our brand", Some("excited"), Some("young adults"), Some("instagram"))
        .await;

    assert_eq!(result.provider_name.as_deref(), Some("openai"));
    assert_eq!(result.thai_text, "ส่งฟรีสำหรับแบรนด์ของเรา");
    assert_eq!(result.usage_tokens, Some(120));
    assert_eq!(result.glossary_terms_applied, vec!["brand → แบรนด์", "free shipping → ส่งฟรี"]);
    assert!(result.warnings.is_empty());
    assert_eq!(result.notes, None);
}

/// Test a failing primary falls back to Google Translate after its retries
#[tokio::test]
async fn test_translate_withFailingPrimary_shouldFallBackToGoogle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/language/translate/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::google_translation("สวัสดีชาวโลก")))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(common::config_for_server(&server.uri()), common::sample_glossary()).unwrap();
    let result = controller.translate("Hello world", None, None, None).await;

    assert_eq!(result.provider_name.as_deref(), Some("google_translate"));
    assert_eq!(result.thai_text, "สวัสดีชาวโลก");
    assert_eq!(result.usage_tokens, None);
}

/// Test a primary that times out is treated as failed and the fallback answers
#[tokio::test]
async fn test_translate_withTimingOutPrimary_shouldFallBackToGoogle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::openai_completion("ช้าเกินไป", 10))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/language/translate/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::google_translation("สวัสดี")))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = common::config_for_server(&server.uri());
    config.openai.timeout_secs = 1;
    config.retry.max_attempts = 1;
    let controller = Controller::new(config, common::sample_glossary()).unwrap();

    let result = controller.translate("Hello", None, None, None).await;

    assert_eq!(result.provider_name.as_deref(), Some("google_translate"));
    assert_eq!(result.thai_text, "สวัสดี");
    assert_eq!(result.notes, None);
}

/// Test every provider failing produces a placeholder with a failure note
#[tokio::test]
async fn test_translate_withAllProvidersDown_shouldReturnPlaceholder() {
    let server = MockServer::start().await;
    mount_openai(&server, 500, "boom").await;
    Mock::given(method("POST"))
        .and(path("/language/translate/v2"))
        .respond_with(ResponseTemplate::new(403).set_body_string("key revoked"))
        .mount(&server)
        .await;

    let controller = Controller::new(common::config_for_server(&server.uri()), common::sample_glossary()).unwrap();
    let result = controller.translate("A new brand story", None, None, None).await;

    assert_eq!(result.provider_name.as_deref(), Some(PLACEHOLDER_PROVIDER));
    let notes = result.notes.unwrap();
    assert!(notes.contains("openai: API responded with error: 500 - boom"));
    assert!(notes.contains("google_translate: Authentication error: key revoked"));
    assert!(result.thai_text.contains("Glossary Applied: brand → แบรนด์"));
    assert!(result.thai_text.ends_with("Source: A new brand story"));
}

/// Test the documented review scenario with no providers configured
#[tokio::test]
async fn test_translate_withoutProviders_shouldFlagSensitiveAndBlockedTerms() {
    let mut config = Config::default();
    config.blocked_terms = vec!["urgent".to_string()];
    config.fallback_provider = FallbackProvider::Disabled;
    let glossary = InMemoryGlossary::with_terms(vec![
        leo::GlossaryTerm::new("call to action", "ปุ่มกระตุ้น").sensitive(),
    ])
    .unwrap();

    let controller = Controller::new(config, Arc::new(glossary)).unwrap();
    let result = controller
        .translate("This call to action should feel urgent.", None, None, None)
        .await;

    assert_eq!(result.glossary_terms_applied, vec!["call to action → ปุ่มกระตุ้น"]);
    assert_eq!(result.provider_name.as_deref(), Some(PLACEHOLDER_PROVIDER));
    assert_eq!(result.warnings.len(), 2);
    assert!(result.warnings[0].starts_with("Sensitive glossary terms present: call to action → ปุ่มกระตุ้น."));
    assert_eq!(result.warnings[1], "Blocked term detected: 'urgent'.");
}

/// Test concurrent translations share one glossary refresh and one orchestrator
#[tokio::test]
async fn test_translate_concurrently_shouldShareGlossarySnapshot() {
    let server = MockServer::start().await;
    mount_openai(&server, 200, "คำแปล").await;

    let controller = Arc::new(
        Controller::new(common::config_for_server(&server.uri()), common::sample_glossary()).unwrap(),
    );
    let first = controller.orchestrator().unwrap();

    let calls = (0..10).map(|i| {
        let controller = controller.clone();
        async move {
            controller
                .translate(&format!("Brand message #{}", i), None, None, None)
                .await
        }
    });
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(|r| r.provider_name.as_deref() == Some("openai")));
    assert!(results.iter().all(|r| r.glossary_terms_applied == vec!["brand → แบรนด์"]));
    assert_eq!(controller.glossary_cache().stats().refreshes, 1);
    assert!(Arc::ptr_eq(&first, &controller.orchestrator().unwrap()));
}
