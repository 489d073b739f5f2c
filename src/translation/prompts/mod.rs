/*!
 * Prompt engineering for Thai copy adaptation.
 *
 * This module provides:
 * - The deterministic prompt layout sent to every provider
 * - The marker contract used to recover the raw source text from a prompt
 */

pub mod templates;

// Re-export main types
pub use templates::{
    build_translation_prompt, extract_source_text, TranslationPromptBuilder, CLOSING_INSTRUCTION,
    CONTENT_MARKER, NO_ENFORCED_TERMS, PROMPT_HEADER,
};
