/*!
 * Glossary snapshot caching.
 *
 * This module keeps the full glossary in memory as a time-limited snapshot so
 * that glossary matching does not hit the authoritative source on every
 * translation.
 */

use chrono::{DateTime, Utc};
use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::glossary::{GlossarySource, GlossaryTerm};
use crate::errors::GlossaryError;

/// Immutable point-in-time copy of the whole glossary
#[derive(Debug, Clone)]
pub struct GlossarySnapshot {
    /// Terms sorted by source term
    terms: Arc<Vec<GlossaryTerm>>,

    /// Wall-clock capture time, for provenance
    captured_at: DateTime<Utc>,

    /// Monotonic capture time, for expiry
    captured: Instant,

    /// Lifetime of the snapshot
    ttl: Duration,
}

impl GlossarySnapshot {
    /// Capture a snapshot, sorting the terms by source term
    pub fn capture(mut terms: Vec<GlossaryTerm>, ttl: Duration) -> Self {
        terms.sort_by(|a, b| a.source_term.cmp(&b.source_term));
        Self {
            terms: Arc::new(terms),
            captured_at: Utc::now(),
            captured: Instant::now(),
            ttl,
        }
    }

    /// Whether the snapshot can still be served
    pub fn is_fresh(&self) -> bool {
        self.captured.elapsed() < self.ttl
    }

    /// Shared handle to the terms
    pub fn terms(&self) -> Arc<Vec<GlossaryTerm>> {
        Arc::clone(&self.terms)
    }

    /// When the snapshot was taken
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

/// Counters describing cache behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Reads served from a fresh snapshot
    pub hits: usize,
    /// Reads that found no fresh snapshot
    pub misses: usize,
    /// Successful reloads from the source
    pub refreshes: usize,
}

/// Glossary cache holding at most one snapshot
///
/// Every read, refresh and invalidation goes through a single async mutex, so
/// a refresh in flight is never observed half-done and an invalidation issued
/// during a refresh always wins.
pub struct GlossaryCache {
    /// Authoritative source
    source: Arc<dyn GlossarySource>,

    /// Snapshot lifetime
    ttl: Duration,

    /// Current snapshot, if any
    snapshot: Mutex<Option<GlossarySnapshot>>,

    hits: AtomicUsize,
    misses: AtomicUsize,
    refreshes: AtomicUsize,
}

impl GlossaryCache {
    /// Create an empty cache over `source`
    pub fn new(source: Arc<dyn GlossarySource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            snapshot: Mutex::new(None),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
        }
    }

    /// Return the full glossary, refreshing from the source when needed
    pub async fn entries(&self) -> Result<Arc<Vec<GlossaryTerm>>, GlossaryError> {
        let mut snapshot = self.snapshot.lock().await;

        if let Some(current) = snapshot.as_ref().filter(|s| s.is_fresh()) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(current.terms());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        // Expired data is dropped before the fetch so a failed refresh leaves nothing behind
        *snapshot = None;

        let terms = self.source.list_all_terms().await?;
        let fresh = GlossarySnapshot::capture(terms, self.ttl);
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        debug!(
            "Glossary cache refreshed with {} terms at {}",
            fresh.terms.len(),
            fresh.captured_at
        );

        let terms = fresh.terms();
        *snapshot = Some(fresh);
        Ok(terms)
    }

    /// Terms whose source term occurs in `text`, case-insensitively, in snapshot order
    pub async fn matched(&self, text: &str) -> Result<Vec<GlossaryTerm>, GlossaryError> {
        let entries = self.entries().await?;
        let lowered = text.to_lowercase();

        Ok(entries
            .iter()
            .filter(|term| term.occurs_in(&lowered))
            .cloned()
            .collect())
    }

    /// Drop the current snapshot so the next read refetches
    pub async fn invalidate(&self) {
        let mut snapshot = self.snapshot.lock().await;
        *snapshot = None;
        debug!("Glossary cache invalidated");
    }

    /// Capture time of the snapshot currently held, if still fresh
    pub async fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot
            .lock()
            .await
            .as_ref()
            .filter(|s| s.is_fresh())
            .map(GlossarySnapshot::captured_at)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
        }
    }

    /// Snapshot lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
