use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::debug;

/// Titles longer than this get cut before they hit the table
pub const MAX_TITLE_CHARS: usize = 200;

/// A scored feed entry as it lives in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub title: String,
    pub link: String,
    pub source: String,
    pub published: String,
    pub score: f64,
    pub deadline_hint: String,
    pub notified: bool,
    pub added_at: DateTime<Utc>,
}

/// Everything the scanner knows about an entry before it is stored.
/// The id, notified flag and insertion time are owned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOpportunity {
    pub title: String,
    pub link: String,
    pub source: String,
    pub published: String,
    pub score: f64,
    pub deadline_hint: String,
}

/// Stable identity of an entry: SHA-256 of its link, hex encoded
pub fn opportunity_id(link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(link.as_bytes());
    hex::encode(hasher.finalize())
}

/// Append-only opportunity store on top of SQLite
///
/// Rows are inserted once per link and never updated afterwards, except for
/// the one-way `notified` flag. Nothing is ever deleted.
pub struct OpportunityStore {
    conn: Connection,
}

impl OpportunityStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        // Initialize schema on first run
        Self::init_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Throwaway store, handy for tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS opportunities (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                link TEXT NOT NULL,
                source TEXT NOT NULL,
                published TEXT NOT NULL,
                score REAL NOT NULL,
                deadline_hint TEXT NOT NULL DEFAULT '',
                notified INTEGER NOT NULL DEFAULT 0,
                added_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Insert the entry if its link has never been seen.
    ///
    /// Returns true when the stored row is still unnotified, which tells the
    /// caller a notification should go out now. A repeat sighting keeps the
    /// first score and flag untouched.
    pub fn upsert(&self, opp: &NewOpportunity) -> Result<bool> {
        let id = opportunity_id(&opp.link);
        let title: String = opp.title.chars().take(MAX_TITLE_CHARS).collect();
        let added_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO opportunities
                (id, title, link, source, published, score, deadline_hint, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id,
                title,
                opp.link,
                opp.source,
                opp.published,
                opp.score,
                opp.deadline_hint,
                added_at
            ],
        )?;

        if inserted == 0 {
            debug!("Already stored: {}", opp.link);
        }

        let notified: bool = self.conn.query_row(
            "SELECT notified FROM opportunities WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;

        Ok(!notified)
    }

    /// Flip the notified flag. Returns false if it was already set (or the id is unknown).
    pub fn mark_notified(&self, id: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE opportunities SET notified = 1 WHERE id = ?1 AND notified = 0",
            params![id],
        )?;
        Ok(changed > 0)
    }

    pub fn get(&self, id: &str) -> Result<Option<Opportunity>> {
        self.conn
            .query_row(
                "SELECT id, title, link, source, published, score, deadline_hint, notified, added_at
                 FROM opportunities WHERE id = ?1",
                params![id],
                Self::row_to_opportunity,
            )
            .optional()
    }

    /// All records, best score first, newest first among equal scores
    pub fn ranked(&self) -> Result<Vec<Opportunity>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, link, source, published, score, deadline_hint, notified, added_at
             FROM opportunities
             ORDER BY score DESC, added_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map([], Self::row_to_opportunity)?;
        let opportunities = rows.collect::<Result<Vec<_>>>()?;
        Ok(opportunities)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM opportunities", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn row_to_opportunity(row: &Row<'_>) -> Result<Opportunity> {
        let added_at: String = row.get(8)?;
        let added_at = DateTime::parse_from_rfc3339(&added_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
            })?;

        Ok(Opportunity {
            id: row.get(0)?,
            title: row.get(1)?,
            link: row.get(2)?,
            source: row.get(3)?,
            published: row.get(4)?,
            score: row.get(5)?,
            deadline_hint: row.get(6)?,
            notified: row.get(7)?,
            added_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_opp(link: &str, title: &str, score: f64) -> NewOpportunity {
        NewOpportunity {
            title: title.to_string(),
            link: link.to_string(),
            source: "Test Feed".to_string(),
            published: "2025-01-01T00:00:00+00:00".to_string(),
            score,
            deadline_hint: String::new(),
        }
    }

    #[test]
    fn test_id_is_stable_sha256_of_link() {
        let a = opportunity_id("https://example.com/a");
        assert_eq!(a, opportunity_id("https://example.com/a"));
        assert_ne!(a, opportunity_id("https://example.com/b"));
        assert_eq!(a.len(), 64);
        assert_eq!(
            opportunity_id(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_upsert_new_entry_wants_notification() {
        let store = OpportunityStore::open_in_memory().unwrap();
        assert!(store.upsert(&new_opp("https://x.io/1", "Airdrop", 30.0)).unwrap());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_upsert_same_link_keeps_first_record() {
        let store = OpportunityStore::open_in_memory().unwrap();
        store.upsert(&new_opp("https://x.io/1", "First", 30.0)).unwrap();
        store.upsert(&new_opp("https://x.io/1", "Second", 90.0)).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let stored = store.get(&opportunity_id("https://x.io/1")).unwrap().unwrap();
        assert_eq!(stored.title, "First");
        assert_eq!(stored.score, 30.0);
        assert!(!stored.notified);
    }

    #[test]
    fn test_notification_signal_fires_at_most_once() {
        let store = OpportunityStore::open_in_memory().unwrap();
        let opp = new_opp("https://x.io/once", "Quest", 40.0);
        let id = opportunity_id(&opp.link);

        assert!(store.upsert(&opp).unwrap());
        assert!(store.mark_notified(&id).unwrap());

        for _ in 0..3 {
            assert!(!store.upsert(&opp).unwrap());
        }
        assert!(!store.mark_notified(&id).unwrap());
        assert!(store.get(&id).unwrap().unwrap().notified);
    }

    #[test]
    fn test_unmarked_record_keeps_signalling() {
        let store = OpportunityStore::open_in_memory().unwrap();
        let opp = new_opp("https://x.io/pending", "Bounty", 20.0);
        assert!(store.upsert(&opp).unwrap());
        assert!(store.upsert(&opp).unwrap());
    }

    #[test]
    fn test_mark_notified_unknown_id() {
        let store = OpportunityStore::open_in_memory().unwrap();
        assert!(!store.mark_notified("nope").unwrap());
    }

    #[test]
    fn test_same_title_different_links_are_distinct() {
        let store = OpportunityStore::open_in_memory().unwrap();
        store.upsert(&new_opp("https://a.io/post", "Same title", 20.0)).unwrap();
        store.upsert(&new_opp("https://b.io/post", "Same title", 20.0)).unwrap();

        assert_eq!(store.count().unwrap(), 2);
        assert!(store.get(&opportunity_id("https://a.io/post")).unwrap().is_some());
        assert!(store.get(&opportunity_id("https://b.io/post")).unwrap().is_some());
    }

    #[test]
    fn test_ranked_orders_by_score_desc() {
        let store = OpportunityStore::open_in_memory().unwrap();
        store.upsert(&new_opp("https://x.io/10", "ten", 10.0)).unwrap();
        store.upsert(&new_opp("https://x.io/50", "fifty", 50.0)).unwrap();
        store.upsert(&new_opp("https://x.io/30", "thirty", 30.0)).unwrap();

        let scores: Vec<f64> = store.ranked().unwrap().iter().map(|o| o.score).collect();
        assert_eq!(scores, vec![50.0, 30.0, 10.0]);
    }

    #[test]
    fn test_ranked_ties_newest_first() {
        let store = OpportunityStore::open_in_memory().unwrap();
        store.upsert(&new_opp("https://x.io/old", "old", 25.0)).unwrap();
        store.upsert(&new_opp("https://x.io/new", "new", 25.0)).unwrap();

        let titles: Vec<String> = store.ranked().unwrap().into_iter().map(|o| o.title).collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[test]
    fn test_title_truncated_on_char_boundary() {
        let store = OpportunityStore::open_in_memory().unwrap();
        let long_title = "é".repeat(MAX_TITLE_CHARS + 50);
        store.upsert(&new_opp("https://x.io/long", &long_title, 20.0)).unwrap();

        let stored = store.get(&opportunity_id("https://x.io/long")).unwrap().unwrap();
        assert_eq!(stored.title.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opportunities.db");
        let id = opportunity_id("https://x.io/durable");

        {
            let store = OpportunityStore::open(&path).unwrap();
            store.upsert(&new_opp("https://x.io/durable", "Testnet", 35.0)).unwrap();
            store.mark_notified(&id).unwrap();
        }

        let store = OpportunityStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert!(!store.upsert(&new_opp("https://x.io/durable", "Testnet", 35.0)).unwrap());
    }
}
