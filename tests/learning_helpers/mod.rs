//! Shared test helpers for learning and pipeline tests.

#![allow(dead_code)]

use glint_lib::error::{GlintError, Result};
use glint_lib::learning::{LearnedRule, RuleCategory, RuleStore};
use glint_lib::llm::{CompletionRequest, ModelClient, Provider};
use glint_lib::settings::ProviderSettings;
use glint_lib::Services;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// A model client that replays one canned answer and records requests.
pub struct ScriptedClient {
    reply: std::result::Result<String, String>,
    pub requests: Mutex<Vec<(Provider, String, CompletionRequest)>>,
}

impl ScriptedClient {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Simulates a network failure.
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.requests.lock().unwrap().last().unwrap().2.clone()
    }
}

impl ModelClient for ScriptedClient {
    fn complete(
        &self,
        provider: Provider,
        api_key: &str,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String>> + Send {
        self.requests
            .lock()
            .unwrap()
            .push((provider, api_key.to_string(), request.clone()));
        let out = self.reply.clone().map_err(GlintError::Transport);
        std::future::ready(out)
    }
}

pub fn anthropic_settings() -> ProviderSettings {
    ProviderSettings::new(Provider::Anthropic).with_key(Provider::Anthropic, "sk-test")
}

pub fn services_with(client: ScriptedClient, settings: ProviderSettings) -> Services<ScriptedClient> {
    let store = Arc::new(RuleStore::in_memory().unwrap());
    Services::new(store, client, settings)
}

/// A stored rule with a fixed id and creation second.
pub fn rule_at(id: &str, secs: i64) -> LearnedRule {
    let mut rule = LearnedRule::new(
        "original",
        "ai output",
        "correction",
        format!("reasoning-{}", id),
        format!("Bad: bad-{id}\nExpected: good-{id}\nInstruction: do-{id}"),
        RuleCategory::Style,
    );
    rule.id = id.to_string();
    rule.created_at = chrono::DateTime::from_timestamp(secs, 0).unwrap();
    rule
}
