/*!
 * Translation orchestration for English to Thai marketing copy.
 *
 * This module contains the core functionality for producing Thai drafts
 * with glossary enforcement. It is split into several submodules:
 *
 * - `core`: The translation service and its result type
 * - `orchestrator`: Retry and fallback across providers
 * - `cache`: Time-limited glossary snapshot cache
 * - `glossary`: Glossary terms, source trait, store and management service
 * - `prompts`: Prompt templates and builders for translation
 */

// Re-export main types for easier usage
pub use self::cache::{CacheStats, GlossaryCache, GlossarySnapshot};
pub use self::core::{TranslationResult, TranslationService, TranslationSettings, PLACEHOLDER_PROVIDER};
pub use self::glossary::{
    GlossaryPage, GlossaryService, GlossarySource, GlossaryTerm, GlossaryTermUpdate, InMemoryGlossary,
};
pub use self::orchestrator::{ProviderOrchestrator, RetryPolicy};

// Re-export prompt types
pub use self::prompts::{build_translation_prompt, extract_source_text, TranslationPromptBuilder};

// Submodules
pub mod cache;
pub mod core;
pub mod glossary;
pub mod orchestrator;
pub mod prompts;
