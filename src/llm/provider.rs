//! LLM providers — the closed set Glint knows how to talk to.
//!
//! Anthropic and Gemini are cloud providers reached over HTTPS and can
//! both run correction analysis. `Local` is reserved for an on-device
//! model and is rejected by every cloud-only operation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const ANTHROPIC_MODEL: &str = "claude-haiku-4-5-20251001";
pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

pub const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Hard cap on every outbound model request. A timeout is terminal.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    Gemini,
    Local,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Anthropic, Provider::Gemini, Provider::Local];

    pub fn id(self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::Local => "local",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "anthropic" => Some(Provider::Anthropic),
            "gemini" => Some(Provider::Gemini),
            "local" => Some(Provider::Local),
            _ => None,
        }
    }

    /// Environment variable holding this provider's API key, if it needs one.
    pub fn env_key(self) -> Option<&'static str> {
        match self {
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Gemini => Some("GEMINI_API_KEY"),
            Provider::Local => None,
        }
    }

    /// Whether the correction analyzer (and any other cloud call) can use it.
    pub fn supports_analysis(self) -> bool {
        matches!(self, Provider::Anthropic | Provider::Gemini)
    }

    pub fn model(self) -> &'static str {
        match self {
            Provider::Anthropic => ANTHROPIC_MODEL,
            Provider::Gemini => GEMINI_MODEL,
            Provider::Local => "local",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Provider metadata exposed to the settings panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub env_key: Option<String>,
    pub supports_analysis: bool,
}

/// All known providers and their display info.
pub fn all_providers() -> Vec<ProviderInfo> {
    Provider::ALL
        .iter()
        .map(|p| ProviderInfo {
            id: p.id().to_string(),
            name: match p {
                Provider::Anthropic => "Claude Haiku — fast, high quality".to_string(),
                Provider::Gemini => "Gemini Flash — fastest, free tier".to_string(),
                Provider::Local => "Local model — offline, no learning".to_string(),
            },
            env_key: p.env_key().map(str::to_string),
            supports_analysis: p.supports_analysis(),
        })
        .collect()
}
