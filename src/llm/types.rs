//! LLM response types — the output contracts stated in every system prompt.
//!
//! The model returns JSON that deserializes directly into these types.
//! Translation mode and task (preset / custom) mode use different keys.

use serde::{Deserialize, Serialize};

use super::fences::strip_code_fences;
use crate::error::{GlintError, Result};

/// Output of a translation-mode prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationOutput {
    pub detected_type: String,
    pub thinking_process: String,
    pub translation_result: String,
}

/// Output of a preset or custom task prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub task_type: String,
    pub thinking_process: String,
    pub result: String,
}

/// Which output contract a prompt asked the model to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    TranslationJson,
    TaskJson,
    /// Image presets ask for bare text, no JSON envelope.
    PlainText,
}

impl OutputFormat {
    pub fn required_keys(self) -> &'static [&'static str] {
        match self {
            OutputFormat::TranslationJson => &["detected_type", "thinking_process", "translation_result"],
            OutputFormat::TaskJson => &["task_type", "thinking_process", "result"],
            OutputFormat::PlainText => &[],
        }
    }
}

/// A decoded model answer, ready for the popup renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelOutput {
    Translation(TranslationOutput),
    Task(TaskOutput),
    PlainText { text: String },
}

impl ModelOutput {
    /// The text the user actually sees.
    pub fn result_text(&self) -> &str {
        match self {
            ModelOutput::Translation(t) => &t.translation_result,
            ModelOutput::Task(t) => &t.result,
            ModelOutput::PlainText { text } => text,
        }
    }
}

pub fn parse_translation_output(raw: &str) -> Result<TranslationOutput> {
    decode(raw)
}

pub fn parse_task_output(raw: &str) -> Result<TaskOutput> {
    decode(raw)
}

/// Decode `raw` according to the contract the prompt requested.
pub fn parse_output(format: OutputFormat, raw: &str) -> Result<ModelOutput> {
    match format {
        OutputFormat::TranslationJson => parse_translation_output(raw).map(ModelOutput::Translation),
        OutputFormat::TaskJson => parse_task_output(raw).map(ModelOutput::Task),
        OutputFormat::PlainText => Ok(ModelOutput::PlainText {
            text: strip_code_fences(raw),
        }),
    }
}

/// Strip fences and decode into `T`, keeping both texts on failure.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str::<T>(&cleaned).map_err(|e| GlintError::MalformedResponse {
        reason: e.to_string(),
        raw: raw.to_string(),
        cleaned,
    })
}
