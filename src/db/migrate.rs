//! Legacy column migration for catalogues created by older releases.
//!
//! Early versions of the stamps table carried only a handful of columns.
//! Opening such a database adds whatever is missing in place, so old
//! catalogues keep working without an export/import cycle.

use anyhow::Result;
use rusqlite::{params, Connection};

use super::Database;

/// Every column a current stamps table must have, with its SQL type.
/// `ALTER TABLE ADD COLUMN` leaves existing rows NULL in the new column,
/// which is why the timestamp backfill below runs after the adds.
const LEGACY_COLUMNS: [(&str, &str); 9] = [
    ("country", "TEXT"),
    ("year", "INTEGER"),
    ("face_value", "TEXT"),
    ("condition", "TEXT"),
    ("catalog_number", "TEXT"),
    ("notes", "TEXT"),
    ("image_path", "TEXT"),
    ("created_at", "TEXT"),
    ("updated_at", "TEXT"),
];

/// Check whether a table exists in the connected database.
pub(crate) fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Column names currently present on the stamps table.
fn stamp_columns(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("PRAGMA table_info(stamps)")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .filter_map(|r| r.ok())
        .collect();
    Ok(columns)
}

impl Database {
    /// Bring an old stamps table up to the current column set.
    ///
    /// Missing columns are added one by one, then rows predating the
    /// timestamp columns get their NULL created_at/updated_at backfilled.
    /// The whole pass runs in a single transaction.
    pub(crate) fn migrate_legacy_columns(&self) -> Result<()> {
        let existing = stamp_columns(&self.conn)?;
        let tx = self.conn.unchecked_transaction()?;

        for (column, sql_type) in LEGACY_COLUMNS {
            if existing.iter().any(|c| c == column) {
                continue;
            }
            tx.execute(
                &format!("ALTER TABLE stamps ADD COLUMN {} {}", column, sql_type),
                [],
            )?;
            tracing::info!(column = %column, "added missing stamps column");
        }

        let now = super::now_timestamp();
        tx.execute(
            "UPDATE stamps SET created_at = ?1 WHERE created_at IS NULL",
            params![now],
        )?;
        tx.execute(
            "UPDATE stamps SET updated_at = ?1 WHERE updated_at IS NULL",
            params![now],
        )?;

        tx.commit()?;
        Ok(())
    }
}
