//! Transient, UI-facing stamp models.
//!
//! A [`StampDraft`] holds one stamp's working fields while an entry form is
//! open; a [`Stockbook`] is the ordered pile of drafts for the session.
//! Neither touches the database — the wiring layer translates drafts into
//! [`crate::NewStamp`] values when the user commits.

use thiserror::Error;

/// Validation failures on form input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("invalid year {input:?}: expected a number")]
    InvalidYear { input: String },
}

/// A stamp as held by an entry form before it is persisted.
///
/// Every field beyond the identifying pair is optional and visible at the
/// type level rather than bolted on after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct StampDraft {
    pub description: String,
    /// Scott catalogue identifier, the form-side analogue of the persisted
    /// `catalog_number`.
    pub scott_number: String,
    pub used: bool,
    pub quantity_used: Option<u32>,
    pub quantity_mint: Option<u32>,
    pub plate_block: bool,
    pub year: Option<i32>,
    pub used_price: Option<f64>,
    pub mint_price: Option<f64>,
}

impl StampDraft {
    pub fn new(description: impl Into<String>, scott_number: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            scott_number: scott_number.into(),
            used: false,
            quantity_used: None,
            quantity_mint: None,
            plate_block: false,
            year: None,
            used_price: None,
            mint_price: None,
        }
    }

    /// Set the year from form text.
    ///
    /// Non-numeric input is rejected with [`DraftError::InvalidYear`] and the
    /// draft is left unchanged; nothing is ever stored in its place.
    pub fn set_year(&mut self, input: &str) -> Result<(), DraftError> {
        let year = input.trim().parse::<i32>().map_err(|_| DraftError::InvalidYear {
            input: input.to_string(),
        })?;
        self.year = Some(year);
        Ok(())
    }
}

impl std::fmt::Display for StampDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.used { "Used" } else { "Unused" };
        write!(
            f,
            "{}, Scott #{}, {}",
            self.description, self.scott_number, status
        )
    }
}

/// Ordered working set of drafts held for the lifetime of a session.
///
/// Not the persisted grouping entity — see [`crate::Collection`] for that.
/// Duplicates are permitted and order is insertion order.
#[derive(Debug, Default)]
pub struct Stockbook {
    stamps: Vec<StampDraft>,
}

impl Stockbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stamp: StampDraft) {
        self.stamps.push(stamp);
    }

    /// Remove the first draft equal to `stamp`. Removing a draft that is not
    /// present does nothing.
    pub fn remove(&mut self, stamp: &StampDraft) {
        if let Some(pos) = self.stamps.iter().position(|s| s == stamp) {
            self.stamps.remove(pos);
        }
    }

    /// Current snapshot, in insertion order.
    pub fn list(&self) -> &[StampDraft] {
        &self.stamps
    }

    pub fn count(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}
