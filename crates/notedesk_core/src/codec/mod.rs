//! Flat-file persistence codec.
//!
//! # Responsibility
//! - Convert a `NoteStore` to and from the line-oriented notes format.
//! - Report per-record problems without aborting the whole decode.
//!
//! # See also
//! - `repo::note_file` for the file I/O wrapper.

pub mod line_format;
