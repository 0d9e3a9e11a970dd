//! Persistence adapters for the notes file.
//!
//! # Responsibility
//! - Own file-system access for loading and saving notes.
//! - Keep codec details behind a load/save contract.
//!
//! # Invariants
//! - Files are opened, read or written fully, and closed before returning.
//! - A missing notes file is an empty collection, not an error.

pub mod note_file;
