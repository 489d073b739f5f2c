/*!
 * Core translation service implementation.
 *
 * This module contains the `TranslationService`, the single entry point that
 * turns English marketing copy into a Thai draft. It resolves glossary matches,
 * builds the prompt, delegates generation to the provider orchestrator and
 * assembles a `TranslationResult` with provenance and reviewer warnings.
 *
 * Translation never fails: when no provider is configured or all of them are
 * exhausted, a deterministic placeholder draft is returned instead.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::cache::GlossaryCache;
use super::glossary::GlossaryTerm;
use super::orchestrator::ProviderOrchestrator;
use super::prompts::build_translation_prompt;
use crate::app_config::Config;

/// Provider name reported for placeholder drafts
pub const PLACEHOLDER_PROVIDER: &str = "placeholder";

/// Notes attached when no provider was available to call
pub const PLACEHOLDER_NOTES: &str = "LLM integration pending or unavailable; placeholder output generated.";

/// Settings the coordinator needs from the application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationSettings {
    /// Tone used when the caller gives none
    pub default_tone: String,

    /// Terms that must be flagged for review when present
    pub blocked_terms: Vec<String>,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            default_tone: "professional".to_string(),
            blocked_terms: Vec::new(),
        }
    }
}

impl From<&Config> for TranslationSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_tone: config.default_tone.clone(),
            blocked_terms: config.blocked_terms.clone(),
        }
    }
}

/// Outcome of a single translation call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Thai draft, or the placeholder text
    pub thai_text: String,

    /// Matched glossary mappings as "source → target"
    pub glossary_terms_applied: Vec<String>,

    /// Free-form notes about how the draft was produced
    pub notes: Option<String>,

    /// Prompt sent to the providers
    pub prompt: Option<String>,

    /// Provider that produced the draft
    pub provider_name: Option<String>,

    /// Tokens consumed, when reported
    pub usage_tokens: Option<u64>,

    /// Cost in USD, when known
    pub cost_usd: Option<f64>,

    /// Reviewer warnings, deduplicated in insertion order
    pub warnings: Vec<String>,
}

/// Draft produced by either a provider or the placeholder path
struct Draft {
    text: String,
    provider_name: String,
    usage_tokens: Option<u64>,
    cost_usd: Option<f64>,
    notes: Option<String>,
}

/// Main translation service
#[derive(Clone)]
pub struct TranslationService {
    /// Tone default and blocked terms
    settings: TranslationSettings,

    /// Glossary snapshot cache, if a glossary is configured
    glossary: Option<Arc<GlossaryCache>>,

    /// Provider orchestrator, if any provider is configured
    orchestrator: Option<Arc<ProviderOrchestrator>>,
}

impl TranslationService {
    /// Create a service with neither glossary nor providers
    pub fn new(settings: TranslationSettings) -> Self {
        Self {
            settings,
            glossary: None,
            orchestrator: None,
        }
    }

    /// Attach a glossary cache
    pub fn with_glossary(mut self, glossary: Arc<GlossaryCache>) -> Self {
        self.glossary = Some(glossary);
        self
    }

    /// Attach a provider orchestrator
    pub fn with_orchestrator(mut self, orchestrator: Arc<ProviderOrchestrator>) -> Self {
        self.orchestrator = Some(orchestrator);
        self
    }

    /// Settings in use
    pub fn settings(&self) -> &TranslationSettings {
        &self.settings
    }

    /// Translate `text` into a Thai draft
    ///
    /// Blank `tone`, `audience` and `channel` values are treated as absent.
    pub async fn translate(
        &self,
        text: &str,
        tone: Option<&str>,
        audience: Option<&str>,
        channel: Option<&str>,
    ) -> TranslationResult {
        let tone = non_blank(tone).unwrap_or(self.settings.default_tone.as_str());
        let audience = non_blank(audience);
        let channel = non_blank(channel);
        let mut warnings = Vec::new();

        let matched = self.matched_terms(text, &mut warnings).await;
        let applied: Vec<String> = matched.iter().map(GlossaryTerm::display_mapping).collect();

        let sensitive: Vec<String> = matched
            .iter()
            .filter(|term| term.is_sensitive)
            .map(GlossaryTerm::display_mapping)
            .collect();
        if !sensitive.is_empty() {
            warnings.push(format!(
                "Sensitive glossary terms present: {}. Ensure reviewer double-checks cultural nuances.",
                sensitive.join(", ")
            ));
        }

        let prompt = build_translation_prompt(text, tone, audience, channel, &matched);
        let draft = self.generate(&prompt, text, tone, audience, channel, &applied).await;

        warnings.extend(self.blocked_term_warnings(text, &draft.text));

        TranslationResult {
            thai_text: draft.text,
            glossary_terms_applied: applied,
            notes: draft.notes,
            prompt: Some(prompt),
            provider_name: Some(draft.provider_name),
            usage_tokens: draft.usage_tokens,
            cost_usd: draft.cost_usd,
            warnings: dedup_preserving_order(warnings),
        }
    }

    async fn matched_terms(&self, text: &str, warnings: &mut Vec<String>) -> Vec<GlossaryTerm> {
        let Some(glossary) = &self.glossary else {
            return Vec::new();
        };

        match glossary.matched(text).await {
            Ok(terms) => {
                debug!("Matched {} glossary terms", terms.len());
                terms
            }
            Err(e) => {
                warn!("Glossary lookup failed: {}", e);
                warnings.push(format!(
                    "Glossary lookup failed: {}. No glossary terms were enforced.",
                    e
                ));
                Vec::new()
            }
        }
    }

    async fn generate(
        &self,
        prompt: &str,
        text: &str,
        tone: &str,
        audience: Option<&str>,
        channel: Option<&str>,
        applied: &[String],
    ) -> Draft {
        let mut notes = None;

        if let Some(orchestrator) = &self.orchestrator {
            match orchestrator.generate(prompt).await {
                Ok(output) => {
                    return Draft {
                        text: output.text,
                        provider_name: output.provider_name,
                        usage_tokens: output.usage_tokens,
                        cost_usd: output.cost_usd,
                        notes: None,
                    };
                }
                Err(e) => {
                    warn!("Falling back to placeholder output: {}", e);
                    notes = Some(format!("Primary providers failed: {}. Using placeholder output.", e));
                }
            }
        } else {
            debug!("No translation providers configured, using placeholder output");
        }

        Draft {
            text: placeholder_draft(text, tone, audience, channel, applied),
            provider_name: PLACEHOLDER_PROVIDER.to_string(),
            usage_tokens: None,
            cost_usd: None,
            notes: notes.or_else(|| Some(PLACEHOLDER_NOTES.to_string())),
        }
    }

    fn blocked_term_warnings(&self, input: &str, output: &str) -> Vec<String> {
        let input = input.to_lowercase();
        let output = output.to_lowercase();
        let mut seen: Vec<String> = Vec::new();
        let mut warnings = Vec::new();

        for term in self.settings.blocked_terms.iter().filter(|t| !t.trim().is_empty()) {
            let needle = term.to_lowercase();
            // Case variants of one term share a single warning, reported as first configured
            if seen.contains(&needle) {
                continue;
            }
            if input.contains(&needle) || output.contains(&needle) {
                warnings.push(format!("Blocked term detected: '{}'.", term));
            }
            seen.push(needle);
        }

        warnings
    }
}

/// Deterministic non-LLM draft used when no provider succeeds
pub fn placeholder_draft(
    text: &str,
    tone: &str,
    audience: Option<&str>,
    channel: Option<&str>,
    applied: &[String],
) -> String {
    let mut lines = vec!["[THAI DRAFT PLACEHOLDER]".to_string(), format!("Tone: {}", tone)];
    if let Some(audience) = audience {
        lines.push(format!("Audience: {}", audience));
    }
    if let Some(channel) = channel {
        lines.push(format!("Channel: {}", channel));
    }
    if !applied.is_empty() {
        lines.push(format!("Glossary Applied: {}", applied.join(", ")));
    }
    lines.push(format!("Source: {}", text));
    lines.join("\n")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}
