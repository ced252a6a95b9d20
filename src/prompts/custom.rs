//! Custom (temporary) task prompts.
//!
//! The user describes the task inline; nothing is persisted. Either field
//! may be missing, in which case a neutral fallback is used so the prompt
//! still reads as a complete instruction.

use super::guardrails::{assemble, guardrails, output_format};
use super::non_blank;
use crate::llm::types::OutputFormat;

const ROLE: &str = r#"## Role
You are a versatile text assistant embedded in a desktop utility. The user describes a one-off task and you carry it out on the text they selected."#;

const IMAGE_ROLE: &str = r#"## Role
You are a versatile assistant with strong visual reading skills. The user describes a one-off task and you carry it out directly on the content of an image."#;

pub const DEFAULT_INPUT_CONTEXT: &str = "General text selected by the user. Infer its kind and language from the content.";
pub const DEFAULT_OUTPUT_REQUIREMENT: &str =
    "Do what the text most plausibly calls for and produce a clear, useful result.";

#[derive(Debug, Default, Clone, Copy)]
pub struct CustomPromptBuilder;

impl CustomPromptBuilder {
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::TaskJson
    }

    pub fn system_prompt(&self, input_context: Option<&str>, output_requirement: Option<&str>) -> String {
        let format = OutputFormat::TaskJson;
        assemble(&[
            ROLE,
            &task_section(input_context, output_requirement),
            guardrails(format),
            output_format(format),
        ])
    }

    /// Image variant keeps the task JSON envelope.
    pub fn image_prompt(&self, input_context: Option<&str>, output_requirement: Option<&str>) -> String {
        let format = OutputFormat::TaskJson;
        assemble(&[
            IMAGE_ROLE,
            &task_section(input_context, output_requirement),
            guardrails(format),
            output_format(format),
        ])
    }
}

fn task_section(input_context: Option<&str>, output_requirement: Option<&str>) -> String {
    format!(
        "## Task\nInput context: {}\nOutput requirement: {}",
        non_blank(input_context).unwrap_or(DEFAULT_INPUT_CONTEXT),
        non_blank(output_requirement).unwrap_or(DEFAULT_OUTPUT_REQUIREMENT)
    )
}
