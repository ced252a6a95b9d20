//! Error taxonomy shared by the learning, prompt and LLM domains.
//!
//! Every fallible public operation returns `glint_lib::Result<T>`.
//! Nothing in this crate retries on its own; errors surface to the
//! caller (normally a UI action handler) for user-facing reporting.

use crate::llm::provider::Provider;

pub type Result<T> = std::result::Result<T, GlintError>;

#[derive(Debug, thiserror::Error)]
pub enum GlintError {
    #[error("No API key configured for {provider}")]
    MissingCredential { provider: Provider },

    #[error("Provider '{provider}' does not support this operation")]
    UnsupportedProvider { provider: Provider },

    #[error("Model API request failed: {0}")]
    Transport(String),

    /// The model answered, but not with the JSON shape we asked for.
    /// `raw` is the text as received, `cleaned` is what the parser saw.
    #[error("Malformed model response: {reason}")]
    MalformedResponse {
        reason: String,
        raw: String,
        cleaned: String,
    },

    #[error("Rule store error: {0}")]
    Persistence(String),

    #[error("Keychain error: {0}")]
    Keyring(String),
}

impl From<rusqlite::Error> for GlintError {
    fn from(e: rusqlite::Error) -> Self {
        GlintError::Persistence(e.to_string())
    }
}

impl From<reqwest::Error> for GlintError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GlintError::Transport(format!("request timed out: {}", e))
        } else {
            GlintError::Transport(e.to_string())
        }
    }
}

impl From<keyring::Error> for GlintError {
    fn from(e: keyring::Error) -> Self {
        GlintError::Keyring(e.to_string())
    }
}
