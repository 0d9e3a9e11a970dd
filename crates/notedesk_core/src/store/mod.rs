//! In-memory note collection.
//!
//! # Responsibility
//! - Own the ordered, bounded sequence of notes for one session.
//! - Expose index-validated CRUD plus search and category filtering.
//!
//! # Invariants
//! - External indices are 1-based and match display order.
//! - Removal compacts the sequence; survivors keep their relative order.
//! - A failed operation never changes previously valid state.

pub mod note_store;
