//! LLM domain — provider metadata, HTTP client and output contracts.
//!
//! Providers:
//!   - Anthropic Claude Haiku
//!   - Google Gemini Flash
//!
//! Shared:
//!   - fences.rs   — markdown code-fence stripping before any JSON decode
//!   - types.rs    — typed output for translation / task prompts

pub mod client;
pub mod fences;
pub mod provider;
pub mod types;

pub use client::{CompletionRequest, HttpModelClient, ModelClient};
pub use provider::Provider;
pub use types::{ModelOutput, OutputFormat, TaskOutput, TranslationOutput};
