//! Prompt coordinator — the single entry point for prompt assembly.
//!
//! Maps a `PromptMode` to its builder and produces the system prompt,
//! user prompt and image prompt the model-calling layer sends. Holds no
//! mutable state; share one instance per process behind an `Arc`.

use std::sync::Arc;

use super::custom::CustomPromptBuilder;
use super::preset::PresetPromptBuilder;
use super::translation::TranslationPromptBuilder;
use super::{non_blank, CustomTask, PromptMode, PromptPreset, AUTO_DETECT};
use crate::learning::RuleStore;
use crate::llm::types::OutputFormat;

/// A built system prompt plus what the caller needs to process the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompt {
    pub text: String,
    pub format: OutputFormat,
    /// Ids of learned rules injected into `text`, newest first.
    pub applied_rule_ids: Vec<String>,
}

pub struct PromptCoordinator {
    translation: TranslationPromptBuilder,
    preset: PresetPromptBuilder,
    custom: CustomPromptBuilder,
    /// The user's default translation style, if they configured one.
    translation_style: Option<PromptPreset>,
}

impl PromptCoordinator {
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self {
            translation: TranslationPromptBuilder::new(store),
            preset: PresetPromptBuilder,
            custom: CustomPromptBuilder,
            translation_style: None,
        }
    }

    pub fn with_translation_style(mut self, style: PromptPreset) -> Self {
        self.translation_style = Some(style);
        self
    }

    pub fn output_format(&self, mode: &PromptMode) -> OutputFormat {
        match mode {
            PromptMode::DefaultTranslation => self.translation.output_format(),
            PromptMode::UserPreset(_) => self.preset.output_format(),
            PromptMode::TemporaryCustom(_) => self.custom.output_format(),
        }
    }

    /// JSON keys the model must return for `mode`.
    pub fn response_schema(&self, mode: &PromptMode) -> &'static [&'static str] {
        self.output_format(mode).required_keys()
    }

    pub fn system_prompt(&self, mode: &PromptMode, with_learned_rules: bool) -> String {
        self.build_system_prompt(mode, with_learned_rules).text
    }

    /// Like `system_prompt`, also reporting format and injected rule ids.
    ///
    /// Learned rules only ever apply to translation mode.
    pub fn build_system_prompt(&self, mode: &PromptMode, with_learned_rules: bool) -> SystemPrompt {
        let format = self.output_format(mode);
        match mode {
            PromptMode::DefaultTranslation => {
                let (text, rules) = self
                    .translation
                    .system_prompt(self.translation_style.as_ref(), with_learned_rules);
                log::debug!(
                    "[PROMPT] Translation system prompt: {} chars, {} learned rules",
                    text.len(),
                    rules.len()
                );
                SystemPrompt {
                    text,
                    format,
                    applied_rule_ids: rules.into_iter().map(|r| r.id).collect(),
                }
            }
            PromptMode::UserPreset(preset) => SystemPrompt {
                text: self.preset.system_prompt(preset),
                format,
                applied_rule_ids: Vec::new(),
            },
            PromptMode::TemporaryCustom(task) => SystemPrompt {
                text: self.custom_prompt(
                    task.input_context.as_deref(),
                    task.output_requirement.as_deref(),
                ),
                format,
                applied_rule_ids: Vec::new(),
            },
        }
    }

    /// User message. Custom mode sends only the input text, because the
    /// system prompt already carries the task.
    pub fn user_prompt(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
        mode: &PromptMode,
    ) -> String {
        match mode {
            PromptMode::TemporaryCustom(_) => format!("Input Text:\n{}", text),
            PromptMode::DefaultTranslation | PromptMode::UserPreset(_) => {
                let instruction = match known_source(source_language) {
                    Some(source) => format!(
                        "Translate the following text from {} to {}.",
                        source, target_language
                    ),
                    None => format!("Translate the following text to {}.", target_language),
                };
                format!("{}\n\nInput Text:\n{}", instruction, text)
            }
        }
    }

    pub fn custom_prompt(&self, input_context: Option<&str>, output_requirement: Option<&str>) -> String {
        self.custom.system_prompt(input_context, output_requirement)
    }

    /// Instruction for direct image-to-text processing.
    ///
    /// For custom mode, explicit `custom_perception` / `custom_instruction`
    /// take precedence over the task carried by the mode.
    pub fn image_prompt(
        &self,
        mode: &PromptMode,
        source_language: Option<&str>,
        target_language: &str,
        custom_perception: Option<&str>,
        custom_instruction: Option<&str>,
    ) -> String {
        match mode {
            PromptMode::DefaultTranslation => {
                self.translation.image_prompt(source_language, target_language)
            }
            PromptMode::UserPreset(preset) => self.preset.image_prompt(preset),
            PromptMode::TemporaryCustom(task) => {
                let CustomTask {
                    input_context,
                    output_requirement,
                } = task;
                self.custom.image_prompt(
                    non_blank(custom_perception).or(input_context.as_deref()),
                    non_blank(custom_instruction).or(output_requirement.as_deref()),
                )
            }
        }
    }

    /// Output contract of the image prompt for `mode`.
    pub fn image_output_format(&self, mode: &PromptMode) -> OutputFormat {
        match mode {
            PromptMode::UserPreset(_) => OutputFormat::PlainText,
            _ => self.output_format(mode),
        }
    }
}

fn known_source(source_language: Option<&str>) -> Option<&str> {
    non_blank(source_language).filter(|s| *s != AUTO_DETECT)
}
