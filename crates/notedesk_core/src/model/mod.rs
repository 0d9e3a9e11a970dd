//! Domain model for notes and their categories.
//!
//! # Responsibility
//! - Define canonical data structures used by store, search and codec.
//! - Keep field validation next to the data it protects.
//!
//! # Invariants
//! - A `Note` can only be built through validating constructors.
//! - `Category` is a closed set; persisted names never change.

pub mod category;
pub mod note;
