//! User-preset prompts.
//!
//! The preset's two free-text fields become the task section. They are
//! user-authored, so the guardrails that follow explicitly outrank them.

use super::guardrails::{assemble, guardrails, output_format};
use super::{non_blank, PromptPreset};
use crate::llm::types::OutputFormat;

const ROLE: &str = r#"## Role
You are a precise text-processing assistant embedded in a desktop utility. You carry out the user's saved task on text they selected on screen."#;

const IMAGE_ROLE: &str = r#"## Role
You are a precise assistant with strong visual reading skills. You carry out the user's saved task directly on the content of an image."#;

const FALLBACK_PERCEPTION: &str = "Text the user selected on screen.";
const FALLBACK_INSTRUCTION: &str = "Process the text as the preset name suggests.";

#[derive(Debug, Default, Clone, Copy)]
pub struct PresetPromptBuilder;

impl PresetPromptBuilder {
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::TaskJson
    }

    pub fn system_prompt(&self, preset: &PromptPreset) -> String {
        let format = OutputFormat::TaskJson;
        assemble(&[ROLE, &task_section(preset), guardrails(format), output_format(format)])
    }

    /// Image variant: plain-text answer, no JSON envelope.
    pub fn image_prompt(&self, preset: &PromptPreset) -> String {
        let format = OutputFormat::PlainText;
        assemble(&[
            IMAGE_ROLE,
            &task_section(preset),
            guardrails(format),
            output_format(format),
        ])
    }
}

fn task_section(preset: &PromptPreset) -> String {
    let perception = non_blank(Some(preset.input_perception.as_str())).unwrap_or(FALLBACK_PERCEPTION);
    let instruction =
        non_blank(Some(preset.output_instruction.as_str())).unwrap_or(FALLBACK_INSTRUCTION);
    format!(
        "## Task: {}\nInput: {}\nWhat to produce: {}",
        preset.name.trim(),
        perception,
        instruction
    )
}
