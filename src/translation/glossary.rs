/*!
 * Approved-term glossary for English to Thai adaptation.
 *
 * This module provides:
 * - `GlossaryTerm`, the immutable source → target mapping
 * - `GlossarySource`, the authoritative read interface the cache refreshes from
 * - `InMemoryGlossary`, a store enforcing source-term uniqueness
 * - `GlossaryService`, which pairs a store with a cache and invalidates on write
 */

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::cache::GlossaryCache;
use crate::errors::GlossaryError;

/// An approved glossary mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    /// English term, unique across the glossary
    pub source_term: String,

    /// Approved Thai rendering
    pub target_term: String,

    /// Part of speech, e.g. "noun"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,

    /// Usage context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Free-form reviewer notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Whether a human reviewer must double-check this term
    #[serde(default)]
    pub is_sensitive: bool,
}

impl GlossaryTerm {
    /// Create a non-sensitive term without metadata.
    pub fn new(source_term: impl Into<String>, target_term: impl Into<String>) -> Self {
        Self {
            source_term: source_term.into(),
            target_term: target_term.into(),
            part_of_speech: None,
            context: None,
            notes: None,
            is_sensitive: false,
        }
    }

    /// Mark the term as sensitive.
    pub fn sensitive(mut self) -> Self {
        self.is_sensitive = true;
        self
    }

    /// Set the part of speech.
    pub fn with_part_of_speech(mut self, part_of_speech: impl Into<String>) -> Self {
        self.part_of_speech = Some(part_of_speech.into());
        self
    }

    /// Set the usage context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set reviewer notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// The "source → target" form shown to reviewers and in prompts.
    pub fn display_mapping(&self) -> String {
        format!("{} → {}", self.source_term, self.target_term)
    }

    /// Whether the term occurs in already-lowercased text.
    pub fn occurs_in(&self, lowered_text: &str) -> bool {
        let needle = self.source_term.to_lowercase();
        !needle.is_empty() && lowered_text.contains(&needle)
    }

    fn validate(&self) -> Result<(), GlossaryError> {
        if self.source_term.trim().is_empty() {
            return Err(GlossaryError::InvalidTerm("source term cannot be empty".to_string()));
        }
        if self.target_term.trim().is_empty() {
            return Err(GlossaryError::InvalidTerm(format!(
                "target term for '{}' cannot be empty",
                self.source_term
            )));
        }
        Ok(())
    }
}

/// Partial update for a stored term; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct GlossaryTermUpdate {
    pub source_term: Option<String>,
    pub target_term: Option<String>,
    pub part_of_speech: Option<Option<String>>,
    pub context: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub is_sensitive: Option<bool>,
}

impl GlossaryTermUpdate {
    fn apply(self, term: &mut GlossaryTerm) {
        if let Some(source_term) = self.source_term {
            term.source_term = source_term;
        }
        if let Some(target_term) = self.target_term {
            term.target_term = target_term;
        }
        if let Some(part_of_speech) = self.part_of_speech {
            term.part_of_speech = part_of_speech;
        }
        if let Some(context) = self.context {
            term.context = context;
        }
        if let Some(notes) = self.notes {
            term.notes = notes;
        }
        if let Some(is_sensitive) = self.is_sensitive {
            term.is_sensitive = is_sensitive;
        }
    }
}

/// Authoritative glossary read interface used by the cache on miss or expiry.
#[async_trait]
pub trait GlossarySource: Send + Sync {
    /// Return every term, ordered by source term.
    async fn list_all_terms(&self) -> Result<Vec<GlossaryTerm>, GlossaryError>;
}

/// In-process glossary store keyed by source term.
#[derive(Debug, Default)]
pub struct InMemoryGlossary {
    terms: RwLock<BTreeMap<String, GlossaryTerm>>,
}

impl InMemoryGlossary {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with terms, rejecting duplicates.
    pub fn with_terms(terms: impl IntoIterator<Item = GlossaryTerm>) -> Result<Self, GlossaryError> {
        let store = Self::new();
        for term in terms {
            store.create(term)?;
        }
        Ok(store)
    }

    /// Insert a new term.
    pub fn create(&self, term: GlossaryTerm) -> Result<GlossaryTerm, GlossaryError> {
        term.validate()?;
        let mut terms = self.terms.write();
        if terms.contains_key(&term.source_term) {
            return Err(GlossaryError::DuplicateSourceTerm(term.source_term));
        }
        terms.insert(term.source_term.clone(), term.clone());
        Ok(term)
    }

    /// Apply a partial update to the term stored under `source_term`.
    pub fn update(
        &self,
        source_term: &str,
        update: GlossaryTermUpdate,
    ) -> Result<GlossaryTerm, GlossaryError> {
        let mut terms = self.terms.write();
        let mut updated = terms
            .get(source_term)
            .cloned()
            .ok_or_else(|| GlossaryError::TermNotFound(source_term.to_string()))?;
        update.apply(&mut updated);
        updated.validate()?;

        if updated.source_term != source_term && terms.contains_key(&updated.source_term) {
            return Err(GlossaryError::DuplicateSourceTerm(updated.source_term));
        }

        terms.remove(source_term);
        terms.insert(updated.source_term.clone(), updated.clone());
        Ok(updated)
    }

    /// Remove the term stored under `source_term`.
    pub fn delete(&self, source_term: &str) -> Result<GlossaryTerm, GlossaryError> {
        self.terms
            .write()
            .remove(source_term)
            .ok_or_else(|| GlossaryError::TermNotFound(source_term.to_string()))
    }

    /// Number of stored terms.
    pub fn len(&self) -> usize {
        self.terms.read().len()
    }

    /// Whether the store holds no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.read().is_empty()
    }
}

#[async_trait]
impl GlossarySource for InMemoryGlossary {
    async fn list_all_terms(&self) -> Result<Vec<GlossaryTerm>, GlossaryError> {
        Ok(self.terms.read().values().cloned().collect())
    }
}

/// One page of a glossary listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryPage {
    /// Terms in this page
    pub items: Vec<GlossaryTerm>,
    /// Number of terms matching the search before paging
    pub total: usize,
}

/// Glossary management backed by a store and a shared snapshot cache.
pub struct GlossaryService {
    store: Arc<InMemoryGlossary>,
    cache: Arc<GlossaryCache>,
}

impl GlossaryService {
    /// Create a service. `cache` must refresh from `store`.
    pub fn new(store: Arc<InMemoryGlossary>, cache: Arc<GlossaryCache>) -> Self {
        Self { store, cache }
    }

    /// List terms whose source or target contains `search` (case-insensitive).
    pub async fn list_terms(
        &self,
        search: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<GlossaryPage, GlossaryError> {
        let entries = self.cache.entries().await?;
        let needle = search.map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase);

        let filtered: Vec<&GlossaryTerm> = entries
            .iter()
            .filter(|term| match &needle {
                Some(needle) => {
                    term.source_term.to_lowercase().contains(needle)
                        || term.target_term.to_lowercase().contains(needle)
                }
                None => true,
            })
            .collect();

        Ok(GlossaryPage {
            total: filtered.len(),
            items: filtered.into_iter().skip(offset).take(limit).cloned().collect(),
        })
    }

    /// Terms occurring in `text`.
    pub async fn matched_terms(&self, text: &str) -> Result<Vec<GlossaryTerm>, GlossaryError> {
        self.cache.matched(text).await
    }

    /// Create a term and invalidate the cache.
    pub async fn create_term(&self, term: GlossaryTerm) -> Result<GlossaryTerm, GlossaryError> {
        let created = self.store.create(term)?;
        debug!("Created glossary term '{}'", created.source_term);
        self.cache.invalidate().await;
        Ok(created)
    }

    /// Update a term and invalidate the cache.
    pub async fn update_term(
        &self,
        source_term: &str,
        update: GlossaryTermUpdate,
    ) -> Result<GlossaryTerm, GlossaryError> {
        let updated = self.store.update(source_term, update)?;
        debug!("Updated glossary term '{}'", source_term);
        self.cache.invalidate().await;
        Ok(updated)
    }

    /// Delete a term and invalidate the cache.
    pub async fn delete_term(&self, source_term: &str) -> Result<(), GlossaryError> {
        self.store.delete(source_term)?;
        debug!("Deleted glossary term '{}'", source_term);
        self.cache.invalidate().await;
        Ok(())
    }
}
