//! Persisted collections: named groupings of stamps with provenance.

use anyhow::Result;
use rusqlite::{params, OptionalExtension};

use super::stamps::Stamp;
use super::{now_timestamp, Database};

/// A named grouping of stamps. Not the transient session list — that is
/// [`crate::Stockbook`].
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub id: i64,
    pub name: String,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
    /// Number of stamps currently in the collection.
    pub stamp_count: i64,
}

/// One stamp's membership in a collection, with acquisition details.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionItem {
    pub id: i64,
    pub collection_id: i64,
    pub stamp_id: i64,
    pub acquisition_date: Option<String>,
    pub purchase_price: Option<f64>,
}

const COLLECTION_SELECT: &str = "SELECT c.id, c.name, c.owner, c.description, c.created_at, \
     (SELECT COUNT(*) FROM collection_items WHERE collection_id = c.id) AS stamp_count \
     FROM collections c";

impl Database {
    pub fn create_collection(
        &self,
        name: &str,
        owner: Option<&str>,
        description: Option<&str>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO collections (name, owner, description, created_at) VALUES (?, ?, ?, ?)",
            params![name, owner, description, now_timestamp()],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, name = %name, "created collection");
        Ok(id)
    }

    pub fn get_collection(&self, id: i64) -> Result<Option<Collection>> {
        let collection = self
            .conn
            .query_row(
                &format!("{} WHERE c.id = ?", COLLECTION_SELECT),
                [id],
                |row| {
                    Ok(Collection {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        owner: row.get(2)?,
                        description: row.get(3)?,
                        created_at: row.get(4)?,
                        stamp_count: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(collection)
    }

    pub fn list_collections(&self) -> Result<Vec<Collection>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY c.name", COLLECTION_SELECT))?;
        let collections = stmt
            .query_map([], |row| {
                Ok(Collection {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    owner: row.get(2)?,
                    description: row.get(3)?,
                    created_at: row.get(4)?,
                    stamp_count: row.get(5)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(collections)
    }

    /// Delete a collection. Its membership rows cascade away; the stamps
    /// themselves are untouched.
    pub fn delete_collection(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM collections WHERE id = ?", [id])?;
        tracing::debug!(id, "deleted collection");
        Ok(())
    }

    /// Record a stamp's membership in a collection, optionally with when and
    /// for how much it was acquired. Returns the new item id.
    pub fn add_stamp_to_collection(
        &self,
        collection_id: i64,
        stamp_id: i64,
        acquisition_date: Option<&str>,
        purchase_price: Option<f64>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO collection_items (collection_id, stamp_id, acquisition_date, purchase_price) \
             VALUES (?, ?, ?, ?)",
            params![collection_id, stamp_id, acquisition_date, purchase_price],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Drop a stamp from a collection. A stamp that was never a member is a
    /// no-op.
    pub fn remove_stamp_from_collection(&self, collection_id: i64, stamp_id: i64) -> Result<()> {
        self.conn.execute(
            "DELETE FROM collection_items WHERE collection_id = ? AND stamp_id = ?",
            params![collection_id, stamp_id],
        )?;
        Ok(())
    }

    /// Membership rows for a collection, with acquisition details, in the
    /// order the stamps were added.
    pub fn collection_items(&self, collection_id: i64) -> Result<Vec<CollectionItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, collection_id, stamp_id, acquisition_date, purchase_price \
             FROM collection_items WHERE collection_id = ? ORDER BY id",
        )?;
        let items = stmt
            .query_map([collection_id], |row| {
                Ok(CollectionItem {
                    id: row.get(0)?,
                    collection_id: row.get(1)?,
                    stamp_id: row.get(2)?,
                    acquisition_date: row.get(3)?,
                    purchase_price: row.get(4)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(items)
    }

    /// Full stamp rows for a collection's members, newest first.
    pub fn collection_stamps(&self, collection_id: i64) -> Result<Vec<Stamp>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.id, s.name, s.country, s.year, s.face_value, s.condition, \
             s.catalog_number, s.notes, s.image_path, s.created_at, s.updated_at \
             FROM stamps s \
             JOIN collection_items ci ON ci.stamp_id = s.id \
             WHERE ci.collection_id = ? \
             ORDER BY s.created_at DESC, s.id DESC",
        )?;
        let stamps = stmt
            .query_map([collection_id], |row| {
                Ok(Stamp {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    country: row.get(2)?,
                    year: row.get(3)?,
                    face_value: row.get(4)?,
                    condition: row.get(5)?,
                    catalog_number: row.get(6)?,
                    notes: row.get(7)?,
                    image_path: row.get(8)?,
                    created_at: row.get(9)?,
                    updated_at: row.get(10)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(stamps)
    }
}
