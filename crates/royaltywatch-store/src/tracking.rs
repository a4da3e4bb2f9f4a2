//! SQLite store for tracked posts.

use std::path::Path;

use chrono::Utc;
use royaltywatch_core::TrackedPost;
use rusqlite::{Connection, params};
use tracing::info;

use crate::StoreError;

const CREATE_TABLE_SQL: &str = "
CREATE TABLE IF NOT EXISTS tracked_posts (
    post_id TEXT PRIMARY KEY,
    beneficiary_handle TEXT NOT NULL,
    beneficiary_id TEXT NOT NULL,
    contract TEXT NOT NULL,
    created_at TEXT NOT NULL,
    notified INTEGER NOT NULL DEFAULT 0
);
";

/// Durable mapping from post id to tracking record.
///
/// Records are inserted once when a post matches the royalty grammar and
/// its beneficiary resolves; only the `notified` flag ever changes after
/// that. Rows are never deleted, so the table doubles as history.
///
/// Supports both in-memory (ephemeral, for tests) and persistent
/// (file-backed) modes. Use [`open`](Self::open) for in-memory and
/// [`open_persistent`](Self::open_persistent) for storage that survives
/// process restarts.
pub struct TrackingStore {
    conn: Connection,
}

impl TrackingStore {
    /// Open an in-memory store.
    pub fn open() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    /// Open or create a persistent store at the given path.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(CREATE_TABLE_SQL)?;
        Ok(Self { conn })
    }

    /// Insert a newly tracked post. Idempotent: when `post_id` already
    /// exists this is a silent no-op and the original row is left intact.
    ///
    /// Returns whether a row was actually inserted, so callers can log
    /// "now tracking" exactly once per post.
    pub fn insert_tracked(
        &self,
        post_id: &str,
        beneficiary_handle: &str,
        beneficiary_id: &str,
        contract: &str,
    ) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO tracked_posts
                 (post_id, beneficiary_handle, beneficiary_id, contract, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                post_id,
                beneficiary_handle,
                beneficiary_id,
                contract,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(changed > 0)
    }

    /// All records not yet notified, in unspecified order.
    pub fn list_unnotified(&self) -> Result<Vec<TrackedPost>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT post_id, beneficiary_handle, beneficiary_id, contract, created_at, notified
             FROM tracked_posts WHERE notified = 0",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TrackedPost {
                post_id: row.get(0)?,
                beneficiary_handle: row.get(1)?,
                beneficiary_id: row.get(2)?,
                contract: row.get(3)?,
                created_at: row.get(4)?,
                notified: row.get::<_, i64>(5)? != 0,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Flip the `notified` flag. Idempotent; marking an already-notified
    /// or unknown post changes nothing.
    pub fn mark_notified(&self, post_id: &str) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("UPDATE tracked_posts SET notified = 1 WHERE post_id = ?1", [post_id])?;
        if changed > 0 {
            info!(post_id, "marked notified");
        }
        Ok(())
    }

    /// Total number of tracked posts, notified or not.
    pub fn tracked_count(&self) -> Result<usize, StoreError> {
        let count: i64 =
            self.conn
                .query_row("SELECT count(*) FROM tracked_posts", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
