//! Tags and stamp-tag associations.

use anyhow::Result;
use rusqlite::params;

use super::stamps::Stamp;
use super::Database;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

impl Database {
    /// Get-or-create a tag by name, in one statement.
    ///
    /// The conflict clause makes the upsert atomic, so there is no window
    /// between a failed insert and the fallback lookup. The no-op
    /// `DO UPDATE` is what lets `RETURNING id` fire on the existing row.
    pub fn add_tag(&self, name: &str) -> Result<i64> {
        let id: i64 = self.conn.query_row(
            "INSERT INTO tags (name) VALUES (?) \
             ON CONFLICT(name) DO UPDATE SET name = excluded.name \
             RETURNING id",
            [name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Apply a tag to a stamp, creating the tag if needed. Re-applying the
    /// same tag is a no-op, not an error.
    pub fn tag_stamp(&self, stamp_id: i64, tag_name: &str) -> Result<()> {
        let tag_id = self.add_tag(tag_name)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO stamp_tags (stamp_id, tag_id) VALUES (?, ?)",
            params![stamp_id, tag_id],
        )?;
        tracing::debug!(stamp_id, tag = %tag_name, "tagged stamp");
        Ok(())
    }

    /// Remove a tag from a stamp. Unknown tag names, or tags the stamp never
    /// had, are a no-op.
    pub fn untag_stamp(&self, stamp_id: i64, tag_name: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM stamp_tags WHERE stamp_id = ? \
             AND tag_id = (SELECT id FROM tags WHERE name = ?)",
            params![stamp_id, tag_name],
        )?;
        Ok(())
    }

    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM tags ORDER BY name")?;
        let tags = stmt
            .query_map([], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(tags)
    }

    /// Tags applied to one stamp, alphabetically.
    pub fn stamp_tags(&self, stamp_id: i64) -> Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name FROM tags t \
             JOIN stamp_tags st ON st.tag_id = t.id \
             WHERE st.stamp_id = ? ORDER BY t.name",
        )?;
        let tags = stmt
            .query_map([stamp_id], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(tags)
    }

    /// Full rows for every stamp carrying the named tag, newest first. An
    /// unknown tag name yields an empty list.
    pub fn stamps_with_tag(&self, tag_name: &str) -> Result<Vec<Stamp>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.id, s.name, s.country, s.year, s.face_value, s.condition, \
             s.catalog_number, s.notes, s.image_path, s.created_at, s.updated_at \
             FROM stamps s \
             JOIN stamp_tags st ON st.stamp_id = s.id \
             JOIN tags t ON t.id = st.tag_id \
             WHERE t.name = ? \
             ORDER BY s.created_at DESC, s.id DESC",
        )?;
        let stamps = stmt
            .query_map([tag_name], |row| {
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

#[cfg(test)]
mod tests {
    use super::super::stamps::NewStamp;
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }

    #[test]
    fn test_add_tag_twice_returns_same_id_one_row() {
        let db = test_db();
        let first = db.add_tag("classic").unwrap();
        let second = db.add_tag("classic").unwrap();
        assert_eq!(first, second);

        let count: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM tags WHERE name = 'classic'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_tag_stamp_is_idempotent() {
        let db = test_db();
        let id = db.add_stamp(&NewStamp::named("Penny Black")).unwrap();

        db.tag_stamp(id, "classic").unwrap();
        db.tag_stamp(id, "classic").unwrap();

        let links: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM stamp_tags WHERE stamp_id = ?",
                [id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(links, 1);
    }

    #[test]
    fn test_stamp_tags_sorted_by_name() {
        let db = test_db();
        let id = db.add_stamp(&NewStamp::named("Penny Black")).unwrap();
        db.tag_stamp(id, "victorian").unwrap();
        db.tag_stamp(id, "classic").unwrap();

        let tags = db.stamp_tags(id).unwrap();
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["classic", "victorian"]);
    }

    #[test]
    fn test_untag_stamp_and_unknown_tag_noop() {
        let db = test_db();
        let id = db.add_stamp(&NewStamp::named("Penny Black")).unwrap();
        db.tag_stamp(id, "classic").unwrap();

        db.untag_stamp(id, "classic").unwrap();
        assert!(db.stamp_tags(id).unwrap().is_empty());
        // The tag row itself survives an untag
        assert_eq!(db.list_tags().unwrap().len(), 1);

        db.untag_stamp(id, "never-existed").unwrap();
    }

    #[test]
    fn test_stamps_with_tag() {
        let db = test_db();
        let a = db.add_stamp(&NewStamp::named("a")).unwrap();
        let b = db.add_stamp(&NewStamp::named("b")).unwrap();
        db.add_stamp(&NewStamp::named("untagged")).unwrap();
        db.tag_stamp(a, "classic").unwrap();
        db.tag_stamp(b, "classic").unwrap();

        let stamps = db.stamps_with_tag("classic").unwrap();
        assert_eq!(stamps.len(), 2);
        // Newest first
        assert_eq!(stamps[0].name, "b");
        assert_eq!(stamps[1].name, "a");

        assert!(db.stamps_with_tag("nope").unwrap().is_empty());
    }
}
