//! Glint — prompt construction and rule-learning core.
//!
//! This is the shell that wires the domains together. No business logic
//! lives here, only module declarations, startup and the shared
//! services every UI action handler receives.
//!
//! Operations are split across:
//!   - commands.rs  — simple one-step operations (learn, list, delete)
//!   - pipeline.rs  — multi-step orchestration (text and image tasks)
//!   - settings.rs  — provider resolution + API keys

pub mod commands;
pub mod error;
pub mod learning;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod settings;

pub use error::{GlintError, Result};

use std::sync::Arc;

use learning::{CorrectionAnalyzer, RuleStore};
use llm::{HttpModelClient, ModelClient};
use prompts::PromptCoordinator;
use settings::{ProviderSettings, SettingsSource};

/// Load `.env.local` → `.env` and start the logger. Safe to call twice.
pub fn init() {
    'env_load: for env_file in [".env.local", ".env"] {
        match dotenvy::from_filename(env_file) {
            Ok(path) => {
                eprintln!("[STARTUP] Loaded {}", path.display());
                break 'env_load;
            }
            Err(e) if e.not_found() => continue,
            Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", env_file, e),
        }
    }

    let _ = env_logger::try_init();
}

/// Process-wide services, created once and handed to every operation.
///
/// The rule store and coordinator are shared by `Arc`; dropping the last
/// `Services` closes the SQLite connection.
pub struct Services<C = HttpModelClient> {
    pub store: Arc<RuleStore>,
    pub coordinator: Arc<PromptCoordinator>,
    pub client: Arc<C>,
    analyzer: CorrectionAnalyzer<Arc<C>>,
}

impl Services<HttpModelClient> {
    /// Open the per-app rule store and build the HTTP client.
    ///
    /// Provider and key are resolved again on every operation.
    pub fn bootstrap() -> Result<Self> {
        let store = Arc::new(RuleStore::open_default()?);
        let settings = SettingsSource::Live;
        let client = HttpModelClient::new()?;
        log::info!(
            "Glint core ready — {} learned rules on file",
            store.count().unwrap_or(0)
        );
        Ok(Self::new(store, client, settings))
    }
}

impl<C: ModelClient> Services<C> {
    pub fn new(store: Arc<RuleStore>, client: C, settings: impl Into<SettingsSource>) -> Self {
        let client = Arc::new(client);
        let coordinator = Arc::new(PromptCoordinator::new(Arc::clone(&store)));
        let analyzer = CorrectionAnalyzer::new(Arc::clone(&client), Arc::clone(&store), settings);
        Self {
            store,
            coordinator,
            client,
            analyzer,
        }
    }

    /// Replace the coordinator, e.g. to apply a user translation style.
    pub fn with_coordinator(mut self, coordinator: PromptCoordinator) -> Self {
        self.coordinator = Arc::new(coordinator);
        self
    }

    pub fn analyzer(&self) -> &CorrectionAnalyzer<Arc<C>> {
        &self.analyzer
    }

    /// Provider settings as of now.
    pub fn settings(&self) -> ProviderSettings {
        self.analyzer.settings().current()
    }
}
