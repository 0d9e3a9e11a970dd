//! Keyword search entry points.
//!
//! # Responsibility
//! - Compile user keywords into case-insensitive patterns.
//! - Decide how malformed patterns are handled (error vs literal fallback).
//!
//! # See also
//! - `store::NoteStore::search`

pub mod pattern;
