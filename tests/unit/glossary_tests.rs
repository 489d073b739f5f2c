/*!
 * Tests for glossary management through the shared cache
 */

use std::sync::Arc;
use std::time::Duration;

use leo::errors::GlossaryError;
use leo::translation::{GlossaryCache, GlossaryService, GlossaryTerm, GlossaryTermUpdate};
use crate::common;

fn service() -> (GlossaryService, Arc<GlossaryCache>) {
    let store = common::sample_glossary();
    let cache = Arc::new(GlossaryCache::new(store.clone(), Duration::from_secs(300)));
    (GlossaryService::new(store, cache.clone()), cache)
}

/// Test a rename is visible on the very next read
#[tokio::test]
async fn test_updateTerm_withRename_shouldReplaceOldMapping() {
    common::init_logging();
    let (service, _) = service();
    assert_eq!(service.matched_terms("Shop the brand").await.unwrap().len(), 1);

    let update = GlossaryTermUpdate {
        source_term: Some("label".to_string()),
        target_term: Some("ฉลาก".to_string()),
        ..Default::default()
    };
    let updated = service.update_term("brand", update).await.unwrap();

    assert_eq!(updated.display_mapping(), "label → ฉลาก");
    assert!(service.matched_terms("Shop the brand").await.unwrap().is_empty());
    assert_eq!(service.matched_terms("New LABEL").await.unwrap().len(), 1);
}

/// Test duplicate creation is rejected without disturbing the cache
#[tokio::test]
async fn test_createTerm_withDuplicate_shouldFailAndKeepSnapshot() {
    let (service, cache) = service();
    let before = cache.entries().await.unwrap();

    let result = service.create_term(GlossaryTerm::new("brand", "ยี่ห้อ")).await;

    assert_eq!(result, Err(GlossaryError::DuplicateSourceTerm("brand".to_string())));
    let after = cache.entries().await.unwrap();
    assert!(Arc::ptr_eq(&before, &after));
}

/// Test paging past the end returns the total but no items
#[tokio::test]
async fn test_listTerms_withOffsetPastEnd_shouldReturnEmptyPage() {
    let (service, _) = service();

    let page = service.list_terms(None, 10, 10).await.unwrap();

    assert_eq!(page.total, 3);
    assert!(page.items.is_empty());
}

/// Test concurrent readers share a single refresh
#[tokio::test]
async fn test_matchedTerms_concurrently_shouldRefreshOnce() {
    let (service, cache) = service();
    let service = Arc::new(service);

    let reads = (0..16).map(|_| {
        let service = service.clone();
        async move { service.matched_terms("free shipping on every call to action").await }
    });
    let results = futures::future::join_all(reads).await;

    for result in results {
        let sources: Vec<_> = result.unwrap().into_iter().map(|t| t.source_term).collect();
        assert_eq!(sources, vec!["call to action", "free shipping"]);
    }
    assert_eq!(cache.stats().refreshes, 1);
    assert_eq!(cache.stats().misses, 1);
}
