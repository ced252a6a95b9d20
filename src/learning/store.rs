//! Learned-rule persistence — one SQLite file per installation.
//!
//! Lives at `{data_dir}/glint/learning.sqlite` (on macOS that is
//! `~/Library/Application Support/glint`). The connection sits behind a
//! mutex, so statements are serialized but separate reads are not a
//! consistent snapshot.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::types::{LearnedRule, RuleCategory};
use crate::error::{GlintError, Result};

pub const DB_FILENAME: &str = "learning.sqlite";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS learned_rules (
    id TEXT PRIMARY KEY,
    original_text TEXT NOT NULL,
    ai_translation TEXT NOT NULL,
    user_correction TEXT NOT NULL,
    reasoning TEXT NOT NULL,
    rule_pattern TEXT NOT NULL,
    category TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    usage_count INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_learned_rules_created ON learned_rules(created_at);
"#;

/// Directory where the rule database is stored.
pub fn default_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("glint")
}

/// Full path to the rule database.
pub fn default_path() -> PathBuf {
    default_dir().join(DB_FILENAME)
}

pub struct RuleStore {
    conn: Mutex<Connection>,
}

impl RuleStore {
    /// Open the per-app database, creating directory and schema as needed.
    pub fn open_default() -> Result<Self> {
        Self::open(default_path())
    }

    /// Open or create a database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                GlintError::Persistence(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        log::info!("[STORE] Opened rule store at {}", path.display());
        Ok(store)
    }

    /// In-memory database, for tests and for running without a data dir.
    pub fn in_memory() -> Result<Self> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create tables and indexes. Safe to call any number of times.
    pub fn initialize(&self) -> Result<()> {
        self.lock()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert `rule`, replacing any existing record with the same id.
    pub fn save(&self, rule: &LearnedRule) -> Result<()> {
        self.lock()?.execute(
            "INSERT OR REPLACE INTO learned_rules
                (id, original_text, ai_translation, user_correction, reasoning,
                 rule_pattern, category, created_at, usage_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                rule.id,
                rule.original_text,
                rule.ai_output,
                rule.user_correction,
                rule.reasoning,
                rule.rule_pattern,
                rule.category.label(),
                rule.created_at.timestamp(),
                rule.usage_count,
            ],
        )?;
        log::info!("[STORE] Saved rule {} ({})", rule.id, rule.category);
        Ok(())
    }

    /// All rules, newest first. Read failures yield an empty list.
    pub fn list_all(&self) -> Vec<LearnedRule> {
        match self.try_list_all() {
            Ok(rules) => rules,
            Err(e) => {
                log::warn!("[STORE] Failed to list rules: {}", e);
                Vec::new()
            }
        }
    }

    fn try_list_all(&self) -> Result<Vec<LearnedRule>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, original_text, ai_translation, user_correction, reasoning,
                    rule_pattern, category, created_at, usage_count
             FROM learned_rules
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredRow {
                id: row.get(0)?,
                original_text: row.get(1)?,
                ai_output: row.get(2)?,
                user_correction: row.get(3)?,
                reasoning: row.get(4)?,
                rule_pattern: row.get(5)?,
                category: row.get(6)?,
                created_at: row.get(7)?,
                usage_count: row.get(8)?,
            })
        })?;

        let mut rules = Vec::new();
        for row in rows {
            match row?.into_rule() {
                Ok(rule) => rules.push(rule),
                Err(e) => log::warn!("[STORE] Skipping unreadable rule: {}", e),
            }
        }
        Ok(rules)
    }

    /// Remove the rule with `id`. Unknown ids are not an error.
    pub fn delete(&self, id: &str) -> Result<()> {
        let removed = self
            .lock()?
            .execute("DELETE FROM learned_rules WHERE id = ?1", params![id])?;
        if removed == 0 {
            log::info!("[STORE] Delete: no rule with id {}", id);
        } else {
            log::info!("[STORE] Deleted rule {}", id);
        }
        Ok(())
    }

    /// Bump `usage_count` for every listed id in one transaction.
    pub fn record_usage(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("UPDATE learned_rules SET usage_count = usage_count + 1 WHERE id = ?1")?;
            for id in ids {
                stmt.execute(params![id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM learned_rules", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Run `op` on tokio's blocking pool so SQLite I/O stays off the executor.
    pub async fn run_blocking<T, F>(self: Arc<Self>, op: F) -> Result<T>
    where
        F: FnOnce(&RuleStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(move || op(&self))
            .await
            .map_err(|e| GlintError::Persistence(format!("store task failed: {}", e)))?
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| GlintError::Persistence(format!("connection lock poisoned: {}", e)))
    }
}

/// Raw column values, converted outside the rusqlite row callback.
struct StoredRow {
    id: String,
    original_text: String,
    ai_output: String,
    user_correction: String,
    reasoning: String,
    rule_pattern: String,
    category: String,
    created_at: i64,
    usage_count: u32,
}

impl StoredRow {
    fn into_rule(self) -> Result<LearnedRule> {
        let created_at = DateTime::<Utc>::from_timestamp(self.created_at, 0).ok_or_else(|| {
            GlintError::Persistence(format!(
                "rule {} has invalid created_at {}",
                self.id, self.created_at
            ))
        })?;
        Ok(LearnedRule {
            id: self.id,
            original_text: self.original_text,
            ai_output: self.ai_output,
            user_correction: self.user_correction,
            reasoning: self.reasoning,
            rule_pattern: self.rule_pattern,
            category: RuleCategory::normalize(&self.category),
            created_at,
            usage_count: self.usage_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_at(id: &str, secs: i64) -> LearnedRule {
        let mut rule = LearnedRule::new(
            "原文",
            "AI output",
            "user fix",
            format!("reason {}", id),
            format!("pattern {}", id),
            RuleCategory::Terminology,
        );
        rule.id = id.to_string();
        rule.created_at = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();
        rule
    }

    #[test]
    fn initialize_is_idempotent() {
        let store = RuleStore::in_memory().unwrap();
        store.initialize().unwrap();
        store.initialize().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn list_is_newest_first() {
        let store = RuleStore::in_memory().unwrap();
        for (id, secs) in [("b", 200), ("a", 100), ("d", 400), ("c", 300)] {
            store.save(&rule_at(id, secs)).unwrap();
        }
        let ids: Vec<String> = store.list_all().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn same_second_ties_prefer_latest_write() {
        let store = RuleStore::in_memory().unwrap();
        store.save(&rule_at("first", 100)).unwrap();
        store.save(&rule_at("second", 100)).unwrap();
        let ids: Vec<String> = store.list_all().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[test]
    fn save_upserts_by_id() {
        let store = RuleStore::in_memory().unwrap();
        store.save(&rule_at("x", 100)).unwrap();
        let mut updated = rule_at("x", 150);
        updated.reasoning = "newer".to_string();
        store.save(&updated).unwrap();

        let rules = store.list_all();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0], updated);
    }

    #[test]
    fn delete_missing_is_noop() {
        let store = RuleStore::in_memory().unwrap();
        store.save(&rule_at("keep", 1)).unwrap();
        store.delete("nope").unwrap();
        assert_eq!(store.count().unwrap(), 1);
        store.delete("keep").unwrap();
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn record_usage_only_touches_listed_ids() {
        let store = RuleStore::in_memory().unwrap();
        store.save(&rule_at("a", 1)).unwrap();
        store.save(&rule_at("b", 2)).unwrap();
        store
            .record_usage(&["a".to_string(), "a".to_string(), "ghost".to_string()])
            .unwrap();

        let rules = store.list_all();
        let a = rules.iter().find(|r| r.id == "a").unwrap();
        let b = rules.iter().find(|r| r.id == "b").unwrap();
        assert_eq!(a.usage_count, 2);
        assert_eq!(b.usage_count, 0);
    }

    #[test]
    fn unknown_stored_category_reads_as_other() {
        let store = RuleStore::in_memory().unwrap();
        store.save(&rule_at("a", 1)).unwrap();
        store
            .lock()
            .unwrap()
            .execute("UPDATE learned_rules SET category = 'legacy' WHERE id = 'a'", [])
            .unwrap();
        assert_eq!(store.list_all()[0].category, RuleCategory::Other);
    }

    #[test]
    fn out_of_range_timestamp_skips_only_that_row() {
        let store = RuleStore::in_memory().unwrap();
        store.save(&rule_at("good", 1)).unwrap();
        store.save(&rule_at("broken", 2)).unwrap();
        store
            .lock()
            .unwrap()
            .execute(
                "UPDATE learned_rules SET created_at = ?1 WHERE id = 'broken'",
                params![i64::MAX],
            )
            .unwrap();

        let ids: Vec<String> = store.list_all().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["good"]);
    }

    #[tokio::test]
    async fn run_blocking_saves_off_the_executor() {
        let store = Arc::new(RuleStore::in_memory().unwrap());
        let rule = rule_at("bg", 5);
        Arc::clone(&store)
            .run_blocking(move |s| s.save(&rule))
            .await
            .unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn list_degrades_to_empty_on_read_failure() {
        let store = RuleStore::in_memory().unwrap();
        store.save(&rule_at("a", 1)).unwrap();
        store
            .lock()
            .unwrap()
            .execute_batch("DROP TABLE learned_rules")
            .unwrap();
        assert!(store.list_all().is_empty());
        assert!(store.save(&rule_at("b", 2)).is_err());
    }
}
