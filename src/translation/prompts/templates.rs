/*!
 * Prompt templates for Thai marketing copy adaptation.
 *
 * The layout produced here is a contract: the literal fallback provider
 * recovers the raw source text from a built prompt via [`extract_source_text`].
 */

use crate::translation::glossary::GlossaryTerm;

/// Fixed role and style header opening every prompt.
pub const PROMPT_HEADER: &str = "You are a senior Thai copywriter. Translate and adapt English marketing content into Thai\n\
so that it feels natively written. Preserve meaning while matching the requested tone, audience, and channel.";

/// Marker line that introduces the source text.
pub const CONTENT_MARKER: &str = "Content to adapt:\n";

/// Fixed closing instruction appended after the source text.
pub const CLOSING_INSTRUCTION: &str = "Output must be polished Thai copy. Avoid literal word-for-word translation and respect \
cultural nuances. Highlight any ambiguous phrases in a reviewer note section.";

/// Line used when no glossary term applies.
pub const NO_ENFORCED_TERMS: &str = "- (no enforced terms)";

const SECTION_SEPARATOR: &str = "\n\n";

/// Builder for constructing translation prompts.
#[derive(Debug, Clone)]
pub struct TranslationPromptBuilder<'a> {
    text: &'a str,
    tone: &'a str,
    audience: Option<&'a str>,
    channel: Option<&'a str>,
    glossary_terms: &'a [GlossaryTerm],
}

impl<'a> TranslationPromptBuilder<'a> {
    /// Create a new prompt builder.
    pub fn new(text: &'a str, tone: &'a str) -> Self {
        Self {
            text,
            tone,
            audience: None,
            channel: None,
            glossary_terms: &[],
        }
    }

    /// Set the target audience. Blank values are ignored.
    pub fn audience(mut self, audience: Option<&'a str>) -> Self {
        self.audience = non_blank(audience);
        self
    }

    /// Set the publishing channel. Blank values are ignored.
    pub fn channel(mut self, channel: Option<&'a str>) -> Self {
        self.channel = non_blank(channel);
        self
    }

    /// Set the glossary terms to enforce, in display order.
    pub fn glossary_terms(mut self, terms: &'a [GlossaryTerm]) -> Self {
        self.glossary_terms = terms;
        self
    }

    /// Render the prompt.
    pub fn build(&self) -> String {
        let mut sections: Vec<String> = vec![
            PROMPT_HEADER.to_string(),
            format!("Desired tone: {}", self.tone),
        ];

        if let Some(audience) = self.audience {
            sections.push(format!("Target audience: {}", audience));
        }
        if let Some(channel) = self.channel {
            sections.push(format!("Channel: {}", channel));
        }

        sections.push(format!("Glossary requirements:\n{}", format_glossary(self.glossary_terms)));
        sections.push(format!("{}{}", CONTENT_MARKER, self.text.trim()));
        sections.push(CLOSING_INSTRUCTION.to_string());

        sections.join(SECTION_SEPARATOR)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn format_glossary(terms: &[GlossaryTerm]) -> String {
    if terms.is_empty() {
        return NO_ENFORCED_TERMS.to_string();
    }

    terms
        .iter()
        .map(|term| format!("- {}", term.display_mapping()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Construct the prompt supplied to the provider orchestrator.
pub fn build_translation_prompt(
    text: &str,
    tone: &str,
    audience: Option<&str>,
    channel: Option<&str>,
    glossary_terms: &[GlossaryTerm],
) -> String {
    TranslationPromptBuilder::new(text, tone)
        .audience(audience)
        .channel(channel)
        .glossary_terms(glossary_terms)
        .build()
}

/// Recover the source text from a prompt built by [`build_translation_prompt`].
///
/// Everything after [`CONTENT_MARKER`] is taken, minus the trailing
/// [`CLOSING_INSTRUCTION`]. A prompt without the marker is returned trimmed.
///
/// This deliberately departs from a literal "everything after the marker"
/// reading: the closing instruction is not source text and must not reach a
/// literal translator.
pub fn extract_source_text(prompt: &str) -> &str {
    let content = match prompt.split_once(CONTENT_MARKER) {
        Some((_, rest)) => rest,
        None => prompt,
    };

    let content = content.trim_end();
    content
        .strip_suffix(CLOSING_INSTRUCTION)
        .unwrap_or(content)
        .trim()
}
