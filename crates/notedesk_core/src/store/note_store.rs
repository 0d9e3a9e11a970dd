//! Bounded ordered note store.
//!
//! # Responsibility
//! - Provide add/get/update/remove over an owned `Vec<Note>`.
//! - Provide keyword search and category filtering with display indices.
//!
//! # Invariants
//! - `len() <= capacity()` at all times.
//! - `update` commits only when the mutator succeeds.
//! - Raw storage is never handed out mutably.

use crate::model::category::Category;
use crate::model::note::{Note, NoteValidationError};
use crate::search::pattern::{KeywordPattern, SearchQuery, SearchResult};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default store capacity.
pub const MAX_NOTES: usize = 100;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(NoteValidationError),
    /// `index` is outside `[1, count]`.
    IndexOutOfRange { index: usize, count: usize },
    CapacityExceeded { capacity: usize },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::IndexOutOfRange { index, count } => {
                if *count == 0 {
                    write!(f, "note number {index} is out of range: no notes available")
                } else {
                    write!(f, "note number {index} is out of range 1..={count}")
                }
            }
            Self::CapacityExceeded { capacity } => {
                write!(f, "note storage is full ({capacity} notes)")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::IndexOutOfRange { .. } => None,
            Self::CapacityExceeded { .. } => None,
        }
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// A note paired with its 1-based display index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteHit<'a> {
    pub index: usize,
    pub note: &'a Note,
}

/// Ordered, bounded collection of notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteStore {
    notes: Vec<Note>,
    capacity: usize,
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore {
    /// Creates an empty store bounded by [`MAX_NOTES`].
    pub fn new() -> Self {
        Self::with_capacity(MAX_NOTES)
    }

    /// Creates an empty store bounded by `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            notes: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.notes.len() >= self.capacity
    }

    /// Appends a note and returns the new count (also its display index).
    ///
    /// # Errors
    /// - `CapacityExceeded` when the store is full; the store is unchanged.
    pub fn add(&mut self, note: Note) -> StoreResult<usize> {
        if self.is_full() {
            warn!(
                "event=note_add module=store status=error error_code=capacity_exceeded capacity={}",
                self.capacity
            );
            return Err(StoreError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        self.notes.push(note);
        let count = self.notes.len();
        debug!("event=note_add module=store status=ok index={count}");
        Ok(count)
    }

    /// Returns the note at 1-based `index`.
    pub fn get(&self, index: usize) -> StoreResult<&Note> {
        let offset = self.offset(index)?;
        Ok(&self.notes[offset])
    }

    /// Applies `mutator` to the note at `index`.
    ///
    /// The mutator runs against a copy; the stored note is replaced only when
    /// it returns `Ok`.
    pub fn update<F>(&mut self, index: usize, mutator: F) -> StoreResult<&Note>
    where
        F: FnOnce(&mut Note) -> Result<(), NoteValidationError>,
    {
        let offset = self.offset(index)?;
        let mut draft = self.notes[offset].clone();
        mutator(&mut draft)?;
        self.notes[offset] = draft;
        debug!("event=note_update module=store status=ok index={index}");
        Ok(&self.notes[offset])
    }

    /// Removes and returns the note at `index`, shifting later notes down.
    pub fn remove(&mut self, index: usize) -> StoreResult<Note> {
        let offset = self.offset(index)?;
        let removed = self.notes.remove(offset);
        info!(
            "event=note_remove module=store status=ok index={index} remaining={}",
            self.notes.len()
        );
        Ok(removed)
    }

    /// Read-only view in insertion order.
    pub fn list_all(&self) -> &[Note] {
        &self.notes
    }

    /// Drops every note.
    pub fn clear(&mut self) {
        self.notes.clear();
    }

    /// Returns notes whose title or content matches the keyword.
    ///
    /// Returns an empty list for blank keywords.
    ///
    /// # Errors
    /// - `InvalidPattern` for malformed keywords unless
    ///   `query.literal_fallback` is set.
    pub fn search(&self, query: &SearchQuery) -> SearchResult<Vec<NoteHit<'_>>> {
        let Some(pattern) = KeywordPattern::compile(query)? else {
            return Ok(Vec::new());
        };

        let hits = self
            .indexed()
            .filter(|hit| pattern.matches(hit.note))
            .collect::<Vec<_>>();
        debug!(
            "event=note_search module=store status=ok literal={} hits={}",
            pattern.is_literal(),
            hits.len()
        );
        Ok(hits)
    }

    /// Returns notes carrying exactly `category`, in insertion order.
    pub fn filter_by_category(&self, category: Category) -> Vec<NoteHit<'_>> {
        self.indexed()
            .filter(|hit| hit.note.category() == category)
            .collect()
    }

    fn indexed(&self) -> impl Iterator<Item = NoteHit<'_>> {
        self.notes
            .iter()
            .enumerate()
            .map(|(offset, note)| NoteHit {
                index: offset + 1,
                note,
            })
    }

    fn offset(&self, index: usize) -> StoreResult<usize> {
        if index == 0 || index > self.notes.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                count: self.notes.len(),
            });
        }
        Ok(index - 1)
    }
}
