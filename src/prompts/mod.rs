//! Prompt domain — system/user prompt construction for every mode.
//!
//! Builders:
//!   - translation.rs — default translation, optional learned rules
//!   - preset.rs      — user-saved presets
//!   - custom.rs      — one-off custom tasks
//!
//! Shared:
//!   - guardrails.rs  — fixed guardrails + output schema sections
//!   - coordinator.rs — picks the builder for a `PromptMode`
//!
//! Every text-mode system prompt has the same section order:
//! role, task, guardrails, [learned rules], output format.

pub mod coordinator;
pub mod custom;
pub mod guardrails;
pub mod preset;
pub mod translation;

pub use coordinator::{PromptCoordinator, SystemPrompt};

use serde::{Deserialize, Serialize};

/// Source-language value meaning "let the model work it out".
pub const AUTO_DETECT: &str = "Auto Detect";

/// A user-saved task configuration. Owned by the settings layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPreset {
    pub name: String,
    pub input_perception: String,
    pub output_instruction: String,
}

/// A one-off task typed by the user at call time; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTask {
    pub input_context: Option<String>,
    pub output_requirement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "config", rename_all = "snake_case")]
pub enum PromptMode {
    DefaultTranslation,
    UserPreset(PromptPreset),
    TemporaryCustom(CustomTask),
}

/// `Some(trimmed)` when `value` has visible content.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
