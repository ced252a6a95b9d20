//! Simple one-step operations invoked by UI action handlers.
//!
//! Each returns errors unchanged so the caller can report them.

use crate::error::Result;
use crate::learning::LearnedRule;
use crate::llm::provider::{self, Provider};
use crate::llm::ModelClient;
use crate::Services;

/// The user edited a translation: learn a rule from the edit.
pub async fn learn_from_correction<C: ModelClient>(
    services: &Services<C>,
    original_text: &str,
    ai_output: &str,
    user_correction: &str,
) -> Result<LearnedRule> {
    services
        .analyzer()
        .analyze(original_text, ai_output, user_correction)
        .await
}

/// All learned rules, newest first. Never fails; see `RuleStore::list_all`.
pub fn list_learned_rules<C>(services: &Services<C>) -> Vec<LearnedRule> {
    services.store.list_all()
}

pub fn delete_learned_rule<C>(services: &Services<C>, id: &str) -> Result<()> {
    services.store.delete(id)
}

/// Provider configuration for the settings panel.
pub fn get_provider_config<C: ModelClient>(services: &Services<C>) -> serde_json::Value {
    let settings = services.settings();
    let providers = provider::all_providers();
    let configured: Vec<&str> = providers
        .iter()
        .filter_map(|p| Provider::from_id(&p.id))
        .filter(|p| p.env_key().is_none() || settings.api_key(*p).is_some())
        .map(|p| p.id())
        .collect();

    serde_json::json!({
        "activeProvider": settings.provider,
        "providers": providers,
        "configuredProviders": configured,
    })
}
