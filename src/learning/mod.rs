//! Learning domain — user corrections become reusable prompt rules.
//!
//!   - types.rs    — LearnedRule + RuleCategory normalization
//!   - store.rs    — SQLite persistence (upsert, newest-first listing)
//!   - analyzer.rs — LLM analysis of a correction into a rule

pub mod analyzer;
pub mod store;
pub mod types;

pub use analyzer::{CorrectionAnalyzer, RuleAnalysis};
pub use store::RuleStore;
pub use types::{LearnedRule, RuleCategory};
