//! Provider resolution and API key storage.
//!
//! Keys are read from the environment first (`.env.local` / `.env` are
//! loaded at startup by `glint_lib::init`), then from the OS keychain.
//! A missing key is not a startup error; operations that need one fail
//! with `MissingCredential` when they run.

use std::collections::HashMap;

use crate::error::{GlintError, Result};
use crate::llm::provider::Provider;

pub const KEYRING_SERVICE: &str = "glint";
pub const PROVIDER_ENV: &str = "LLM_PROVIDER";

/// The selected provider plus every API key we could find.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub provider: Provider,
    api_keys: HashMap<Provider, String>,
}

impl ProviderSettings {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            api_keys: HashMap::new(),
        }
    }

    pub fn with_key(mut self, provider: Provider, key: impl Into<String>) -> Self {
        self.api_keys.insert(provider, key.into());
        self
    }

    /// Determine the provider and load keys.
    ///
    /// Priority:
    /// 1. LLM_PROVIDER env var (explicit override)
    /// 2. First provider with an API key (env var or keychain)
    /// 3. Anthropic as final default
    pub fn resolve() -> Self {
        let mut api_keys = HashMap::new();
        for provider in Provider::ALL {
            if let Some(key) = lookup_key(provider) {
                api_keys.insert(provider, key);
            }
        }

        let provider = std::env::var(PROVIDER_ENV)
            .ok()
            .and_then(|p| Provider::from_id(&p))
            .map(|p| {
                log::info!("[SETTINGS] Provider override: {}", p);
                p
            })
            .or_else(|| {
                Provider::ALL
                    .into_iter()
                    .find(|p| api_keys.contains_key(p))
            })
            .unwrap_or(Provider::Anthropic);

        log::info!(
            "[SETTINGS] Active provider: {} (key configured: {})",
            provider,
            api_keys.contains_key(&provider)
        );
        Self { provider, api_keys }
    }

    /// Non-empty API key for `provider`, if configured.
    pub fn api_key(&self, provider: Provider) -> Option<&str> {
        self.api_keys
            .get(&provider)
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty())
    }

    pub fn require_key(&self, provider: Provider) -> Result<&str> {
        self.api_key(provider)
            .ok_or(GlintError::MissingCredential { provider })
    }

    /// Provider and key for a cloud call, or the reason we can't make one.
    pub fn cloud_credentials(&self) -> Result<(Provider, &str)> {
        let provider = self.provider;
        if !provider.supports_analysis() {
            return Err(GlintError::UnsupportedProvider { provider });
        }
        Ok((provider, self.require_key(provider)?))
    }
}

/// Where operations read their provider settings from.
#[derive(Debug, Clone)]
pub enum SettingsSource {
    /// Resolve env + keychain on every operation, so a key saved after
    /// startup is picked up without a restart.
    Live,
    /// Pinned settings, for tests and hosts that manage keys themselves.
    Fixed(ProviderSettings),
}

impl SettingsSource {
    pub fn current(&self) -> ProviderSettings {
        match self {
            Self::Live => ProviderSettings::resolve(),
            Self::Fixed(settings) => settings.clone(),
        }
    }
}

impl From<ProviderSettings> for SettingsSource {
    fn from(settings: ProviderSettings) -> Self {
        Self::Fixed(settings)
    }
}

/// Env var first, then the OS keychain.
fn lookup_key(provider: Provider) -> Option<String> {
    let env_key = provider.env_key()?;
    if let Ok(key) = std::env::var(env_key) {
        if !key.is_empty() {
            return Some(key);
        }
    }

    let entry = keyring::Entry::new(KEYRING_SERVICE, provider.id()).ok()?;
    match entry.get_password() {
        Ok(key) if !key.is_empty() => {
            log::info!("[SETTINGS] Loaded {} key from OS keychain", provider);
            Some(key)
        }
        _ => None,
    }
}

/// Save an API key to the OS keychain.
pub fn save_api_key(provider: Provider, api_key: &str) -> Result<()> {
    if provider.env_key().is_none() {
        // No API key needed for local provider
        return Ok(());
    }
    keyring::Entry::new(KEYRING_SERVICE, provider.id())?.set_password(api_key)?;
    log::info!("[SETTINGS] API key saved for provider: {}", provider);
    Ok(())
}
