//! Learned rule types.
//!
//! A `LearnedRule` is distilled from one user correction of a
//! translation and is replayed verbatim into later translation prompts.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of mistake a rule corrects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleCategory {
    #[serde(rename = "attributeToVerb")]
    AttributeToVerb,
    #[serde(rename = "metaphor")]
    Metaphor,
    #[serde(rename = "terminology")]
    Terminology,
    #[serde(rename = "style")]
    Style,
    #[serde(rename = "other")]
    Other,
}

/// Every accepted spelling, keyed by its folded form (lowercase, no
/// separators). Canonical labels are listed first for each category.
const CATEGORY_TOKENS: &[(&str, RuleCategory)] = &[
    ("attributetoverb", RuleCategory::AttributeToVerb),
    ("attributeverb", RuleCategory::AttributeToVerb),
    ("attrtoverb", RuleCategory::AttributeToVerb),
    ("nountoverb", RuleCategory::AttributeToVerb),
    ("verb", RuleCategory::AttributeToVerb),
    ("verbalization", RuleCategory::AttributeToVerb),
    ("metaphor", RuleCategory::Metaphor),
    ("metaphors", RuleCategory::Metaphor),
    ("idiom", RuleCategory::Metaphor),
    ("figurative", RuleCategory::Metaphor),
    ("terminology", RuleCategory::Terminology),
    ("term", RuleCategory::Terminology),
    ("terms", RuleCategory::Terminology),
    ("glossary", RuleCategory::Terminology),
    ("jargon", RuleCategory::Terminology),
    ("style", RuleCategory::Style),
    ("tone", RuleCategory::Style),
    ("register", RuleCategory::Style),
    ("wording", RuleCategory::Style),
    ("other", RuleCategory::Other),
    ("misc", RuleCategory::Other),
    ("general", RuleCategory::Other),
];

impl RuleCategory {
    pub const ALL: [RuleCategory; 5] = [
        RuleCategory::AttributeToVerb,
        RuleCategory::Metaphor,
        RuleCategory::Terminology,
        RuleCategory::Style,
        RuleCategory::Other,
    ];

    /// The label stored in the database and shown to the model.
    pub fn label(self) -> &'static str {
        match self {
            RuleCategory::AttributeToVerb => "attributeToVerb",
            RuleCategory::Metaphor => "metaphor",
            RuleCategory::Terminology => "terminology",
            RuleCategory::Style => "style",
            RuleCategory::Other => "other",
        }
    }

    /// Exact, case-sensitive label match.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Map whatever the model returned onto a category. Never fails:
    /// unrecognized values become `Other`.
    pub fn normalize(raw: &str) -> Self {
        if let Some(exact) = Self::from_label(raw) {
            return exact;
        }
        let folded: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        CATEGORY_TOKENS
            .iter()
            .find(|(token, _)| *token == folded)
            .map(|(_, category)| *category)
            .unwrap_or(RuleCategory::Other)
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnedRule {
    pub id: String,
    pub original_text: String,
    pub ai_output: String,
    pub user_correction: String,
    pub reasoning: String,
    pub rule_pattern: String,
    pub category: RuleCategory,
    pub created_at: DateTime<Utc>,
    pub usage_count: u32,
}

impl LearnedRule {
    /// Fresh rule with a new id, stamped now (whole seconds, as stored),
    /// never used.
    pub fn new(
        original_text: impl Into<String>,
        ai_output: impl Into<String>,
        user_correction: impl Into<String>,
        reasoning: impl Into<String>,
        rule_pattern: impl Into<String>,
        category: RuleCategory,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            original_text: original_text.into(),
            ai_output: ai_output.into(),
            user_correction: user_correction.into(),
            reasoning: reasoning.into(),
            rule_pattern: rule_pattern.into(),
            category,
            created_at: Utc::now().trunc_subsecs(0),
            usage_count: 0,
        }
    }
}
