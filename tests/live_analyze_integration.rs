//! Live integration test for the LEARN pipeline.
//!
//! Calls the real provider API, so it only runs when a key is present.
//! Loads the API key from .env.local using dotenvy — same as the app.
//! Run with: ANTHROPIC_API_KEY=sk-... cargo test --test live_analyze_integration

use glint_lib::learning::{RuleCategory, RuleStore};
use glint_lib::settings::ProviderSettings;
use glint_lib::Services;
use std::sync::Arc;

fn load_env() {
    let manifest_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let env_path = manifest_dir.join(".env.local");
    if env_path.exists() {
        dotenvy::from_path(&env_path).expect("Failed to load .env.local");
        eprintln!("[TEST] Loaded .env.local");
    }
}

#[tokio::test]
async fn test_analyze_real_correction() {
    load_env();

    let settings = ProviderSettings::resolve();
    if settings.api_key(settings.provider).is_none() || !settings.provider.supports_analysis() {
        eprintln!("SKIP: No API key for {}", settings.provider);
        return;
    }

    let store = Arc::new(RuleStore::in_memory().unwrap());
    let client = glint_lib::llm::HttpModelClient::new().unwrap();
    let services = Services::new(Arc::clone(&store), client, settings);

    let start = std::time::Instant::now();
    let rule = services
        .analyzer()
        .analyze(
            "She is a fast learner.",
            "Elle est une apprenante rapide.",
            "Elle apprend vite.",
        )
        .await
        .expect("analysis should succeed with a valid key");

    eprintln!("[TEST] Analyze returned in {}ms", start.elapsed().as_millis());
    eprintln!("[TEST] category: {}", rule.category);
    eprintln!("[TEST] reasoning: {}", rule.reasoning);
    eprintln!("[TEST] pattern: {}", rule.rule_pattern);

    assert!(RuleCategory::ALL.contains(&rule.category));
    assert!(!rule.reasoning.is_empty());
    assert!(!rule.rule_pattern.is_empty());
    assert_eq!(store.list_all().len(), 1);
}
