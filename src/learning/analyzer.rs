//! LEARN pipeline — turns a user correction into a persisted rule.
//!
//! 1. Build the analysis prompt from (original, AI output, correction)
//! 2. Resolve provider + API key, call the model (30s timeout)
//! 3. Strip code fences, decode the three-key JSON
//! 4. Normalize the category (never fails)
//! 5. Save the rule to the store

use serde::Deserialize;
use std::sync::Arc;

use super::store::RuleStore;
use super::types::{LearnedRule, RuleCategory};
use crate::error::{GlintError, Result};
use crate::llm::client::{truncate, CompletionRequest, ModelClient};
use crate::llm::types::decode;
use crate::settings::SettingsSource;

pub const ANALYSIS_MAX_TOKENS: u32 = 512;

pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a translation quality analyst. A user corrected a machine translation. Your job is to explain the mistake and distill it into one reusable rule that will be shown to the translator in future requests.

<rules>
1. ALWAYS respond with a single valid JSON object. No prose, no markdown fences.
2. "reasoning": one or two sentences explaining what the AI got wrong and why the correction is better.
3. "rulePattern": a reusable instruction in exactly this form:
   Bad: <the kind of phrasing the AI produced>
   Expected: <the kind of phrasing the user wants>
   Instruction: <an imperative rule the translator can apply to new text>
4. "category": exactly one of "attributeToVerb", "metaphor", "terminology", "style", "other".
   - attributeToVerb: an attribute or noun phrase should become a verb construction
   - metaphor: figurative language or idioms were translated too literally
   - terminology: a term, name or domain word was mistranslated
   - style: tone, register, length or word choice
   - other: anything else
5. Generalize. The rule must help with different sentences, not only this one.
</rules>

<response_format>
{
  "reasoning": "<why the correction is better>",
  "rulePattern": "Bad: ...\nExpected: ...\nInstruction: ...",
  "category": "<one of the five categories>"
}
</response_format>"#;

/// Builds the user message for the LEARN call.
pub fn build_analysis_message(original_text: &str, ai_output: &str, user_correction: &str) -> String {
    format!(
        r#"<original_text>
{original_text}
</original_text>

<ai_translation>
{ai_output}
</ai_translation>

<user_correction>
{user_correction}
</user_correction>"#
    )
}

/// The JSON shape the analysis prompt asks for.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAnalysis {
    pub reasoning: String,
    pub rule_pattern: String,
    pub category: String,
}

/// Decode a raw analysis response; fences are stripped first.
pub fn parse_analysis(raw: &str) -> Result<RuleAnalysis> {
    decode::<RuleAnalysis>(raw).inspect_err(|e| {
        if let GlintError::MalformedResponse { reason, raw, cleaned } = e {
            log::warn!("[LEARN] Failed to parse analysis: {}", reason);
            log::warn!("[LEARN] Raw response: {}", truncate(raw, 500));
            log::warn!("[LEARN] Cleaned response: {}", truncate(cleaned, 500));
        }
    })
}

pub struct CorrectionAnalyzer<C> {
    client: C,
    store: Arc<RuleStore>,
    settings: SettingsSource,
}

impl<C: ModelClient> CorrectionAnalyzer<C> {
    pub fn new(client: C, store: Arc<RuleStore>, settings: impl Into<SettingsSource>) -> Self {
        Self {
            client,
            store,
            settings: settings.into(),
        }
    }

    pub fn settings(&self) -> &SettingsSource {
        &self.settings
    }

    /// Analyze one correction and persist the resulting rule.
    ///
    /// Inputs are passed through unvalidated. Errors from the provider
    /// check, the HTTP call, decoding and the store all propagate.
    pub async fn analyze(
        &self,
        original_text: &str,
        ai_output: &str,
        user_correction: &str,
    ) -> Result<LearnedRule> {
        let settings = self.settings.current();
        let provider = settings.provider;
        if !provider.supports_analysis() {
            log::warn!("[LEARN] Provider {} cannot analyze corrections", provider);
            return Err(GlintError::UnsupportedProvider { provider });
        }
        let api_key = settings.require_key(provider)?;

        log::info!(
            "[LEARN] Analyzing correction: {} chars original, {} chars corrected",
            original_text.len(),
            user_correction.len()
        );

        let mut request = CompletionRequest::text(
            ANALYSIS_SYSTEM_PROMPT,
            build_analysis_message(original_text, ai_output, user_correction),
        );
        request.max_tokens = ANALYSIS_MAX_TOKENS;

        let response = self.client.complete(provider, api_key, &request).await?;
        let analysis = parse_analysis(&response)?;

        let category = RuleCategory::normalize(&analysis.category);
        if category.label() != analysis.category {
            log::info!(
                "[LEARN] Category '{}' normalized to '{}'",
                analysis.category,
                category
            );
        }

        let rule = LearnedRule::new(
            original_text,
            ai_output,
            user_correction,
            analysis.reasoning,
            analysis.rule_pattern,
            category,
        );
        let saved = rule.clone();
        Arc::clone(&self.store)
            .run_blocking(move |store| store.save(&saved))
            .await?;
        log::info!("[LEARN] Learned rule {} ({})", rule.id, rule.category);
        Ok(rule)
    }
}
