//! Translation-mode prompts, with optional personal learning rules.

use std::sync::Arc;

use super::guardrails::{assemble, guardrails, output_format};
use super::{non_blank, PromptPreset, AUTO_DETECT};
use crate::learning::{LearnedRule, RuleStore};
use crate::llm::types::OutputFormat;

/// Most rules injected into one prompt; the newest ones win.
pub const MAX_LEARNED_RULES: usize = 10;

pub const LEARNED_RULES_HEADER: &str = "## Personal Learning Rules";

const ROLE: &str = r#"## Role
You are a professional translator embedded in a desktop utility. You translate text the user selected on screen faithfully, naturally and idiomatically, preserving meaning, tone and formatting intent."#;

pub const DEFAULT_SOURCE_STYLE: &str =
    "Text in any language copied from an app, document or web page. It may be a single word, a phrase, a sentence or several paragraphs.";
pub const DEFAULT_TARGET_STYLE: &str =
    "A fluent translation that reads as if a native speaker wrote it. Prefer natural phrasing over word-for-word renderings.";

const IMAGE_ROLE: &str = r#"## Role
You are a professional translator with strong visual reading skills. You read the text shown in an image and translate it directly."#;

pub struct TranslationPromptBuilder {
    store: Arc<RuleStore>,
}

impl TranslationPromptBuilder {
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self { store }
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::TranslationJson
    }

    /// The rules a prompt built now would contain, newest first.
    pub fn rules_for_prompt(&self) -> Vec<LearnedRule> {
        let mut rules = self.store.list_all();
        rules.truncate(MAX_LEARNED_RULES);
        rules
    }

    /// Build the system prompt, reading learned rules only when enabled.
    /// Also returns the rules that went into it.
    pub fn system_prompt(
        &self,
        preset: Option<&PromptPreset>,
        with_learned_rules: bool,
    ) -> (String, Vec<LearnedRule>) {
        let rules = if with_learned_rules {
            self.rules_for_prompt()
        } else {
            Vec::new()
        };
        (render(preset, &rules), rules)
    }

    pub fn image_prompt(&self, source_language: Option<&str>, target_language: &str) -> String {
        let task = match non_blank(source_language).filter(|s| *s != AUTO_DETECT) {
            Some(source) => format!(
                "## Task\nRead all text visible in the image (it is written in {source}) and translate it to {target_language}. Keep the reading order of the original layout."
            ),
            None => format!(
                "## Task\nRead all text visible in the image, detect its language, and translate it to {target_language}. Keep the reading order of the original layout."
            ),
        };
        let format = OutputFormat::TranslationJson;
        assemble(&[IMAGE_ROLE, &task, guardrails(format), output_format(format)])
    }
}

/// Pure assembly: role, task, guardrails, rules (if any), output format.
pub fn render(preset: Option<&PromptPreset>, rules: &[LearnedRule]) -> String {
    let (source_style, target_style) = match preset {
        Some(p) => (
            non_blank(Some(p.input_perception.as_str())).unwrap_or(DEFAULT_SOURCE_STYLE),
            non_blank(Some(p.output_instruction.as_str())).unwrap_or(DEFAULT_TARGET_STYLE),
        ),
        None => (DEFAULT_SOURCE_STYLE, DEFAULT_TARGET_STYLE),
    };
    let task = format!(
        "## Task\nSource text: {source_style}\nExpected translation: {target_style}\nThe target language is named in the user message."
    );
    let rules_section = learned_rules_section(rules);
    let format = OutputFormat::TranslationJson;

    assemble(&[
        ROLE,
        &task,
        guardrails(format),
        &rules_section,
        output_format(format),
    ])
}

/// Empty string when there are no rules, so no bare header is emitted.
pub fn learned_rules_section(rules: &[LearnedRule]) -> String {
    if rules.is_empty() {
        return String::new();
    }
    let mut section = format!(
        "{LEARNED_RULES_HEADER}\nThe user corrected earlier translations. Apply these rules whenever they are relevant. They are listed newest first."
    );
    for (i, rule) in rules.iter().take(MAX_LEARNED_RULES).enumerate() {
        section.push_str(&format!(
            "\n\n### Rule {} [{}]\nReasoning: {}\nPattern:\n{}",
            i + 1,
            rule.category,
            rule.reasoning,
            rule.rule_pattern
        ));
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::RuleCategory;
    use crate::prompts::guardrails::{GUARDRAILS_HEADER, OUTPUT_FORMAT_HEADER};

    fn rule(n: usize) -> LearnedRule {
        LearnedRule::new(
            "o",
            "a",
            "c",
            format!("reason-{n}"),
            format!("Bad: b{n}\nExpected: e{n}\nInstruction: i{n}"),
            RuleCategory::Metaphor,
        )
    }

    #[test]
    fn sections_are_ordered() {
        let prompt = render(None, &[rule(1)]);
        let task = prompt.find("## Task").unwrap();
        let guard = prompt.find(GUARDRAILS_HEADER).unwrap();
        let rules = prompt.find(LEARNED_RULES_HEADER).unwrap();
        let out = prompt.find(OUTPUT_FORMAT_HEADER).unwrap();
        assert!(task < guard && guard < rules && rules < out);
    }

    #[test]
    fn no_rules_no_header() {
        let prompt = render(None, &[]);
        assert!(!prompt.contains(LEARNED_RULES_HEADER));
        assert!(prompt.contains("\"translation_result\""));
    }

    #[test]
    fn rule_block_is_verbatim() {
        let section = learned_rules_section(&[rule(7)]);
        assert!(section.contains("### Rule 1 [metaphor]"));
        assert!(section.contains("Reasoning: reason-7"));
        assert!(section.contains("Bad: b7\nExpected: e7\nInstruction: i7"));
    }

    #[test]
    fn section_caps_at_ten() {
        let rules: Vec<_> = (0..12).map(rule).collect();
        let section = learned_rules_section(&rules);
        assert!(section.contains("### Rule 10 "));
        assert!(!section.contains("### Rule 11 "));
    }

    #[test]
    fn preset_styles_replace_defaults() {
        let preset = PromptPreset {
            name: "Legal".to_string(),
            input_perception: "Contract clauses".to_string(),
            output_instruction: "Formal legal register".to_string(),
        };
        let prompt = render(Some(&preset), &[]);
        assert!(prompt.contains("Source text: Contract clauses"));
        assert!(prompt.contains("Expected translation: Formal legal register"));
        assert!(!prompt.contains(DEFAULT_TARGET_STYLE));
    }

    #[test]
    fn image_prompt_mentions_known_source() {
        let builder = TranslationPromptBuilder::new(Arc::new(RuleStore::in_memory().unwrap()));
        let auto = builder.image_prompt(Some(AUTO_DETECT), "German");
        assert!(auto.contains("detect its language, and translate it to German"));
        let known = builder.image_prompt(Some("Japanese"), "German");
        assert!(known.contains("written in Japanese"));
        assert!(known.contains("\"translation_result\""));
    }
}
