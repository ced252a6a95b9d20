//! Provider settings are read per operation, not once at startup.
//!
//! Mutates process env vars, so it lives in its own test binary.

mod learning_helpers;

use glint_lib::error::GlintError;
use glint_lib::learning::RuleStore;
use glint_lib::llm::Provider;
use glint_lib::settings::SettingsSource;
use glint_lib::Services;
use learning_helpers::ScriptedClient;
use std::sync::Arc;

const ANALYSIS_REPLY: &str =
    r#"{"reasoning":"Too literal.","rulePattern":"Bad: a\nExpected: b\nInstruction: c","category":"style"}"#;

#[tokio::test]
async fn key_configured_after_startup_is_picked_up() {
    std::env::set_var("LLM_PROVIDER", "anthropic");
    std::env::remove_var("ANTHROPIC_API_KEY");

    let store = Arc::new(RuleStore::in_memory().unwrap());
    let services = Services::new(
        Arc::clone(&store),
        ScriptedClient::replying(ANALYSIS_REPLY),
        SettingsSource::Live,
    );
    if services.settings().api_key(Provider::Anthropic).is_some() {
        eprintln!("SKIP: OS keychain already holds an anthropic key");
        return;
    }

    let err = services
        .analyzer()
        .analyze("original", "ai output", "correction")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GlintError::MissingCredential { provider: Provider::Anthropic }
    ));
    assert_eq!(services.client.call_count(), 0);

    std::env::set_var("ANTHROPIC_API_KEY", "sk-configured-later");

    let rule = services
        .analyzer()
        .analyze("original", "ai output", "correction")
        .await
        .unwrap();
    assert_eq!(rule.reasoning, "Too literal.");
    assert_eq!(store.count().unwrap(), 1);

    let requests = services.client.requests.lock().unwrap();
    assert_eq!(requests[0].0, Provider::Anthropic);
    assert_eq!(requests[0].1, "sk-configured-later");
}
