//! Append-only snapshot store over SQLite.
//!
//! Snapshots are immutable rows keyed by an autoincrementing sequence id;
//! the engine never updates a row in place. Every snapshot carries a
//! SHA-256 of its canonical JSON so corruption is detected at read time
//! and skipped rather than propagated.
//!
//! One writer per store is assumed. WAL plus busy_timeout lets concurrent
//! processes coexist, but two writers racing `put` means the last
//! snapshot wins; there is no cross-process lock.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use affect_core::{EmotionalState, TriggerVector};

use crate::error::{Result, StoreError};
use crate::schema;

/// Retention floor: cleanup never drops below this many snapshots, no
/// matter how aggressive the retention window is.
pub const SNAPSHOT_FLOOR: i64 = 10;

const SECS_PER_DAY: u64 = 86_400;

/// One logged interaction, as returned by history queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: i64,
    pub session_id: String,
    pub created_at: u64,
    pub user_text: String,
    pub trigger_vector: String,
    pub confidence: f64,
}

/// Counts reported by a cleanup pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub snapshots_deleted: usize,
    pub interactions_deleted: usize,
}

#[derive(Debug)]
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn, path: None })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// On-disk location, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = ?1")?;
        let result = stmt.query_row([key], |row| row.get(0)).ok();
        Ok(result)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // --- Snapshots ---

    /// Append a snapshot; returns its sequence id.
    pub fn put(&self, state: &EmotionalState) -> Result<i64> {
        let json = canonical_json(state)?;
        let hash = content_hash(&json);

        self.conn.execute(
            "INSERT INTO snapshots (session_id, created_at, state, content_hash)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                state.session_id.to_string(),
                state.timestamp as i64,
                json,
                hash
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Latest valid snapshot, optionally scoped to one session.
    ///
    /// Walks rows newest-first, stopping at the first whose hash and JSON
    /// verify; bad rows are skipped with a warning. `None` means the store
    /// holds no snapshot for the session; [`StoreError::Corrupt`] means
    /// rows exist but every one failed verification.
    pub fn get_latest(&self, session: Option<Uuid>) -> Result<Option<EmotionalState>> {
        let mut stmt = self.conn.prepare(
            "SELECT seq, state, content_hash FROM snapshots
             WHERE (?1 IS NULL OR session_id = ?1)
             ORDER BY seq DESC",
        )?;
        let session_str = session.map(|s| s.to_string());
        let mut rows = stmt.query(params![session_str])?;

        let mut skipped = 0usize;
        while let Some(row) = rows.next()? {
            let seq: i64 = row.get(0)?;
            let json: String = row.get(1)?;
            let stored_hash: String = row.get(2)?;

            if content_hash(&json) != stored_hash {
                tracing::warn!(seq, "snapshot hash mismatch, skipping");
                skipped += 1;
                continue;
            }
            match serde_json::from_str::<EmotionalState>(&json) {
                Ok(state) => return Ok(Some(state)),
                Err(e) => {
                    tracing::warn!(seq, error = %e, "snapshot JSON invalid, skipping");
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            return Err(StoreError::Corrupt(format!(
                "no valid snapshot among {skipped} rows"
            )));
        }
        Ok(None)
    }

    /// Stored hash of the newest snapshot row, unverified.
    pub fn latest_hash(&self) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT content_hash FROM snapshots ORDER BY seq DESC LIMIT 1")?;
        Ok(stmt.query_row([], |row| row.get(0)).ok())
    }

    pub fn snapshot_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?;
        Ok(count)
    }

    // --- Interactions ---

    pub fn record_interaction(
        &self,
        session_id: Uuid,
        created_at: u64,
        user_text: &str,
        vector: &TriggerVector,
        confidence: f64,
    ) -> Result<()> {
        let deltas: std::collections::BTreeMap<&str, f64> =
            vector.iter().map(|(p, d)| (p.as_str(), d)).collect();
        let vector_json = serde_json::to_string(&deltas)
            .map_err(|e| StoreError::InvalidData(format!("trigger vector: {e}")))?;

        self.conn.execute(
            "INSERT INTO interactions (session_id, created_at, user_text, trigger_vector, confidence)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session_id.to_string(),
                created_at as i64,
                user_text,
                vector_json,
                confidence
            ],
        )?;
        Ok(())
    }

    /// Most recent interactions, newest first.
    pub fn emotion_history(&self, limit: usize) -> Result<Vec<InteractionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, created_at, user_text, trigger_vector, confidence
             FROM interactions ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map([limit as i64], |row| {
                Ok(InteractionRecord {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    created_at: row.get::<_, i64>(2)? as u64,
                    user_text: row.get(3)?,
                    trigger_vector: row.get(4)?,
                    confidence: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<_, _>>()?;
        Ok(rows)
    }

    pub fn interaction_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM interactions", [], |row| row.get(0))?;
        Ok(count)
    }

    // --- Retention ---

    /// Delete interactions and snapshots older than `retention_days`,
    /// but always keep the newest [`SNAPSHOT_FLOOR`] snapshots.
    pub fn cleanup(&self, retention_days: u32, now: u64) -> Result<CleanupReport> {
        let cutoff = now.saturating_sub(u64::from(retention_days) * SECS_PER_DAY) as i64;

        let tx = self.conn.unchecked_transaction()?;
        let interactions_deleted = tx.execute(
            "DELETE FROM interactions WHERE created_at < ?1",
            [cutoff],
        )?;
        let snapshots_deleted = tx.execute(
            "DELETE FROM snapshots WHERE created_at < ?1
             AND seq NOT IN (SELECT seq FROM snapshots ORDER BY seq DESC LIMIT ?2)",
            params![cutoff, SNAPSHOT_FLOOR],
        )?;
        tx.commit()?;

        let report = CleanupReport {
            snapshots_deleted,
            interactions_deleted,
        };
        tracing::info!(
            snapshots = report.snapshots_deleted,
            interactions = report.interactions_deleted,
            retention_days,
            "cleanup complete"
        );
        Ok(report)
    }
}

/// Canonical JSON for hashing: serde preserves struct field order and the
/// state's maps are BTreeMaps, so serialization is deterministic.
fn canonical_json(state: &EmotionalState) -> Result<String> {
    serde_json::to_string(state).map_err(|e| StoreError::InvalidData(format!("state: {e}")))
}

fn content_hash(json: &str) -> String {
    hex::encode(Sha256::digest(json.as_bytes()))
}
