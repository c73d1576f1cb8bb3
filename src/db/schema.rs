pub const SCHEMA: &str = r#"
-- Stamps table: one row per catalogued stamp
CREATE TABLE IF NOT EXISTS stamps (
    id INTEGER PRIMARY KEY,
    name TEXT,
    country TEXT,
    year INTEGER,
    face_value TEXT,
    condition TEXT,
    catalog_number TEXT,
    notes TEXT,
    image_path TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Named groupings of stamps
CREATE TABLE IF NOT EXISTS collections (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    owner TEXT,
    description TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Membership of a stamp in a collection, with provenance
CREATE TABLE IF NOT EXISTS collection_items (
    id INTEGER PRIMARY KEY,
    collection_id INTEGER NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
    stamp_id INTEGER NOT NULL REFERENCES stamps(id) ON DELETE CASCADE,
    acquisition_date TEXT,
    purchase_price REAL
);

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS stamp_tags (
    stamp_id INTEGER NOT NULL REFERENCES stamps(id) ON DELETE CASCADE,
    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    PRIMARY KEY (stamp_id, tag_id)
);

-- Indexes for common lookups
CREATE INDEX IF NOT EXISTS idx_stamps_country ON stamps(country);
CREATE INDEX IF NOT EXISTS idx_stamps_catalog ON stamps(catalog_number);
CREATE INDEX IF NOT EXISTS idx_collection_items_collection ON collection_items(collection_id);
"#;
