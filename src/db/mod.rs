mod schema;
pub mod collections;
pub mod migrate;
pub mod stamps;
pub mod tags;

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use std::path::Path;

pub use collections::{Collection, CollectionItem};
pub use schema::SCHEMA;
pub use stamps::{NewStamp, Stamp, StampFilter, StampPatch};
pub use tags::Tag;

/// The stamp catalogue store: one SQLite connection, opened at startup and
/// held for the life of the process.
///
/// All operations are synchronous and commit individually. Callers run
/// [`Database::initialize`] once before any CRUD call.
pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    /// Open (or create) the catalogue file at `path`.
    ///
    /// Foreign-key enforcement is switched on here; cascade deletes depend
    /// on it.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        tracing::debug!(path = ?path, "opened stamp catalogue");
        Ok(Self { conn })
    }

    /// Open a non-persistent catalogue (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Bring the store up to the current schema. Idempotent; safe to call on
    /// every startup.
    ///
    /// For catalogues written by older releases the legacy column migration
    /// runs first, so the index creation in the schema batch never sees an
    /// incomplete stamps table. On a fresh database the migration is skipped
    /// outright.
    pub fn initialize(&self) -> Result<()> {
        if migrate::table_exists(&self.conn, "stamps")? {
            self.migrate_legacy_columns()?;
        }
        self.ensure_schema()?;
        tracing::debug!("stamp catalogue schema ensured");
        Ok(())
    }

    /// Apply the `CREATE ... IF NOT EXISTS` schema batch.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}

/// Current UTC time in the store's timestamp format (`YYYY-MM-DD HH:MM:SS`,
/// the same shape `datetime('now')` produces, so values sort either way).
pub(crate) fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
