//! Stampbook — a stamp collection catalogue backed by a local SQLite file.
//!
//! The crate is the data-access layer of a single-user desktop application:
//! it records stamps, groups them into collections, tags them, and keeps
//! everything in one database file. The interface layer (forms, event loop)
//! lives elsewhere and talks to this crate through [`Database`].
//!
//! ## Example
//!
//! ```no_run
//! use stampbook::{Database, NewStamp};
//!
//! let db = Database::open(std::path::Path::new("stamps.db")).unwrap();
//! db.initialize().unwrap();
//!
//! let mut stamp = NewStamp::named("Blue Penny");
//! stamp.country = Some("Mauritius".to_string());
//! stamp.year = Some(1847);
//! let id = db.add_stamp(&stamp).unwrap();
//!
//! db.tag_stamp(id, "classic").unwrap();
//! ```

pub mod config;
pub mod db;
pub mod draft;
pub mod logging;

pub use config::Config;
pub use db::{
    Collection, CollectionItem, Database, NewStamp, Stamp, StampFilter, StampPatch, Tag,
};
pub use draft::{DraftError, StampDraft, Stockbook};

/// Default row cap for list queries.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Default database filename, resolved against the working directory.
pub const DATABASE_FILENAME: &str = "stamps.db";
