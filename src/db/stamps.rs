//! Stamp rows and their CRUD surface.

use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row, ToSql};

use super::{now_timestamp, Database};

/// A catalogued stamp as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    pub id: i64,
    pub name: String,
    pub country: Option<String>,
    pub year: Option<i64>,
    pub face_value: Option<String>,
    pub condition: Option<String>,
    pub catalog_number: Option<String>,
    pub notes: Option<String>,
    pub image_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for a new stamp. Only `name` is required.
#[derive(Debug, Clone, Default)]
pub struct NewStamp {
    pub name: String,
    pub country: Option<String>,
    pub year: Option<i64>,
    pub face_value: Option<String>,
    pub condition: Option<String>,
    pub catalog_number: Option<String>,
    pub notes: Option<String>,
    pub image_path: Option<String>,
}

impl NewStamp {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a stamp. `None` fields are left untouched; an
/// all-`None` patch is empty and updates nothing, not even `updated_at`.
#[derive(Debug, Clone, Default)]
pub struct StampPatch {
    pub name: Option<String>,
    pub country: Option<String>,
    pub year: Option<i64>,
    pub face_value: Option<String>,
    pub condition: Option<String>,
    pub catalog_number: Option<String>,
    pub notes: Option<String>,
    pub image_path: Option<String>,
}

impl StampPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.country.is_none()
            && self.year.is_none()
            && self.face_value.is_none()
            && self.condition.is_none()
            && self.catalog_number.is_none()
            && self.notes.is_none()
            && self.image_path.is_none()
    }
}

/// Equality filter for stamp queries. Each set field becomes one `column = ?`
/// predicate; an empty filter matches every row. The column names are fixed
/// here, so nothing caller-supplied ever reaches the SQL text.
#[derive(Debug, Clone, Default)]
pub struct StampFilter {
    pub name: Option<String>,
    pub country: Option<String>,
    pub year: Option<i64>,
    pub condition: Option<String>,
    pub catalog_number: Option<String>,
}

const STAMP_SELECT: &str = "SELECT id, name, country, year, face_value, condition, \
     catalog_number, notes, image_path, created_at, updated_at FROM stamps";

fn stamp_from_row(row: &Row) -> rusqlite::Result<Stamp> {
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
}

impl Database {
    /// Insert a stamp and return its new id. Both timestamps are set to the
    /// same instant here rather than left to the column defaults.
    pub fn add_stamp(&self, stamp: &NewStamp) -> Result<i64> {
        let now = now_timestamp();
        self.conn.execute(
            "INSERT INTO stamps (name, country, year, face_value, condition, \
             catalog_number, notes, image_path, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                stamp.name,
                stamp.country,
                stamp.year,
                stamp.face_value,
                stamp.condition,
                stamp.catalog_number,
                stamp.notes,
                stamp.image_path,
                now,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, name = %stamp.name, "added stamp");
        Ok(id)
    }

    /// Fetch one stamp. Absence is `Ok(None)`, never an error.
    pub fn get_stamp(&self, id: i64) -> Result<Option<Stamp>> {
        let stamp = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?", STAMP_SELECT),
                [id],
                stamp_from_row,
            )
            .optional()?;
        Ok(stamp)
    }

    /// Most recent stamps first, capped at `limit`.
    ///
    /// Inserts within the same second share a `created_at`, so id breaks the
    /// tie to keep the order deterministic.
    pub fn list_stamps(&self, limit: usize) -> Result<Vec<Stamp>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} ORDER BY created_at DESC, id DESC LIMIT ?",
            STAMP_SELECT
        ))?;
        let stamps = stmt
            .query_map([limit as i64], stamp_from_row)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(stamps)
    }

    /// Stamps matching every set field of `filter`, exactly. An empty filter
    /// returns all rows.
    pub fn find_stamps(&self, filter: &StampFilter) -> Result<Vec<Stamp>> {
        let mut predicates: Vec<&str> = Vec::new();
        let mut values: Vec<&dyn ToSql> = Vec::new();

        if let Some(name) = &filter.name {
            predicates.push("name = ?");
            values.push(name);
        }
        if let Some(country) = &filter.country {
            predicates.push("country = ?");
            values.push(country);
        }
        if let Some(year) = &filter.year {
            predicates.push("year = ?");
            values.push(year);
        }
        if let Some(condition) = &filter.condition {
            predicates.push("condition = ?");
            values.push(condition);
        }
        if let Some(catalog_number) = &filter.catalog_number {
            predicates.push("catalog_number = ?");
            values.push(catalog_number);
        }

        let query = if predicates.is_empty() {
            format!("{} ORDER BY created_at DESC, id DESC", STAMP_SELECT)
        } else {
            format!(
                "{} WHERE {} ORDER BY created_at DESC, id DESC",
                STAMP_SELECT,
                predicates.join(" AND ")
            )
        };

        let mut stmt = self.conn.prepare(&query)?;
        let stamps = stmt
            .query_map(&values[..], stamp_from_row)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(stamps)
    }

    /// Apply a partial update. Any non-empty patch also refreshes
    /// `updated_at`; an empty patch touches nothing at all.
    pub fn update_stamp(&self, id: i64, patch: &StampPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<&dyn ToSql> = Vec::new();

        if let Some(name) = &patch.name {
            assignments.push("name = ?");
            values.push(name);
        }
        if let Some(country) = &patch.country {
            assignments.push("country = ?");
            values.push(country);
        }
        if let Some(year) = &patch.year {
            assignments.push("year = ?");
            values.push(year);
        }
        if let Some(face_value) = &patch.face_value {
            assignments.push("face_value = ?");
            values.push(face_value);
        }
        if let Some(condition) = &patch.condition {
            assignments.push("condition = ?");
            values.push(condition);
        }
        if let Some(catalog_number) = &patch.catalog_number {
            assignments.push("catalog_number = ?");
            values.push(catalog_number);
        }
        if let Some(notes) = &patch.notes {
            assignments.push("notes = ?");
            values.push(notes);
        }
        if let Some(image_path) = &patch.image_path {
            assignments.push("image_path = ?");
            values.push(image_path);
        }

        let now = now_timestamp();
        assignments.push("updated_at = ?");
        values.push(&now);
        values.push(&id);

        self.conn.execute(
            &format!("UPDATE stamps SET {} WHERE id = ?", assignments.join(", ")),
            &values[..],
        )?;
        tracing::debug!(id, "updated stamp");
        Ok(())
    }

    /// Delete a stamp. Foreign-key cascades remove its collection items and
    /// tag associations.
    pub fn delete_stamp(&self, id: i64) -> Result<()> {
        self.conn.execute("DELETE FROM stamps WHERE id = ?", [id])?;
        tracing::debug!(id, "deleted stamp");
        Ok(())
    }

    pub fn count_stamps(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM stamps", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }

    fn blue_penny() -> NewStamp {
        NewStamp {
            name: "Blue Penny".to_string(),
            country: Some("Mauritius".to_string()),
            year: Some(1847),
            catalog_number: Some("MRT-1".to_string()),
            ..NewStamp::default()
        }
    }

    #[test]
    fn test_add_then_get_roundtrip() {
        let db = test_db();
        let id = db.add_stamp(&blue_penny()).unwrap();

        let stamp = db.get_stamp(id).unwrap().unwrap();
        assert_eq!(stamp.id, id);
        assert_eq!(stamp.name, "Blue Penny");
        assert_eq!(stamp.country.as_deref(), Some("Mauritius"));
        assert_eq!(stamp.year, Some(1847));
        assert_eq!(stamp.catalog_number.as_deref(), Some("MRT-1"));
        assert!(stamp.face_value.is_none());
        assert!(!stamp.created_at.is_empty());
        assert_eq!(stamp.created_at, stamp.updated_at);
    }

    #[test]
    fn test_get_missing_is_none_not_error() {
        let db = test_db();
        assert!(db.get_stamp(42).unwrap().is_none());
    }

    #[test]
    fn test_list_orders_newest_first_and_caps() {
        let db = test_db();
        for i in 0..5 {
            db.add_stamp(&NewStamp::named(format!("stamp-{}", i)))
                .unwrap();
        }

        let stamps = db.list_stamps(3).unwrap();
        assert_eq!(stamps.len(), 3);
        assert_eq!(stamps[0].name, "stamp-4");
        assert_eq!(stamps[1].name, "stamp-3");
        assert_eq!(stamps[2].name, "stamp-2");
    }

    #[test]
    fn test_list_scenario_blue_penny() {
        let db = test_db();
        db.add_stamp(&blue_penny()).unwrap();

        let stamps = db.list_stamps(10).unwrap();
        assert_eq!(stamps.len(), 1);
        let s = &stamps[0];
        assert_eq!(s.name, "Blue Penny");
        assert_eq!(s.country.as_deref(), Some("Mauritius"));
        assert_eq!(s.year, Some(1847));
        assert_eq!(s.catalog_number.as_deref(), Some("MRT-1"));
    }

    #[test]
    fn test_find_with_empty_filter_returns_all() {
        let db = test_db();
        db.add_stamp(&NewStamp::named("a")).unwrap();
        db.add_stamp(&NewStamp::named("b")).unwrap();

        let all = db.find_stamps(&StampFilter::default()).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_find_matches_equality_on_set_fields() {
        let db = test_db();
        db.add_stamp(&blue_penny()).unwrap();
        let mut other = NewStamp::named("Red Penny");
        other.country = Some("Mauritius".to_string());
        other.year = Some(1848);
        db.add_stamp(&other).unwrap();

        let filter = StampFilter {
            country: Some("Mauritius".to_string()),
            year: Some(1847),
            ..StampFilter::default()
        };
        let found = db.find_stamps(&filter).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Blue Penny");

        let none = db
            .find_stamps(&StampFilter {
                country: Some("France".to_string()),
                ..StampFilter::default()
            })
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let db = test_db();
        let id = db.add_stamp(&blue_penny()).unwrap();
        let before = db.get_stamp(id).unwrap().unwrap();

        db.update_stamp(id, &StampPatch::default()).unwrap();

        let after = db.get_stamp(id).unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_update_sets_fields_and_refreshes_updated_at() {
        let db = test_db();
        let id = db.add_stamp(&blue_penny()).unwrap();
        let before = db.get_stamp(id).unwrap().unwrap();

        let patch = StampPatch {
            condition: Some("Mint".to_string()),
            notes: Some("centred left".to_string()),
            ..StampPatch::default()
        };
        db.update_stamp(id, &patch).unwrap();

        let after = db.get_stamp(id).unwrap().unwrap();
        assert_eq!(after.condition.as_deref(), Some("Mint"));
        assert_eq!(after.notes.as_deref(), Some("centred left"));
        // Untouched fields survive
        assert_eq!(after.name, "Blue Penny");
        assert_eq!(after.year, Some(1847));
        // created_at is immutable; updated_at only moves forward
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[test]
    fn test_update_missing_id_is_quiet() {
        let db = test_db();
        let patch = StampPatch {
            name: Some("ghost".to_string()),
            ..StampPatch::default()
        };
        db.update_stamp(999, &patch).unwrap();
    }

    #[test]
    fn test_delete_removes_row_and_associations() {
        let db = test_db();
        let id = db.add_stamp(&blue_penny()).unwrap();
        db.tag_stamp(id, "classic").unwrap();
        let coll = db.create_collection("Rarities", None, None).unwrap();
        db.add_stamp_to_collection(coll, id, None, None).unwrap();

        db.delete_stamp(id).unwrap();

        assert!(db.get_stamp(id).unwrap().is_none());
        let tag_links: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM stamp_tags WHERE stamp_id = ?",
                [id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tag_links, 0);
        let item_links: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM collection_items WHERE stamp_id = ?",
                [id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(item_links, 0);
        // The tag itself and the collection remain
        assert_eq!(db.list_tags().unwrap().len(), 1);
        assert!(db.get_collection(coll).unwrap().is_some());
    }

    #[test]
    fn test_count_stamps() {
        let db = test_db();
        assert_eq!(db.count_stamps().unwrap(), 0);
        db.add_stamp(&NewStamp::named("a")).unwrap();
        db.add_stamp(&NewStamp::named("b")).unwrap();
        assert_eq!(db.count_stamps().unwrap(), 2);
    }
}
