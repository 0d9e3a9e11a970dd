//! Notes file repository.
//!
//! # Responsibility
//! - Read the whole notes file and decode it into a store.
//! - Serialize a store and overwrite the notes file with it.
//!
//! # Invariants
//! - Saves overwrite the target in one write; there is no append mode and no
//!   atomic rename, so a crash mid-write can leave a partial file.
//! - Load never mutates caller state; it returns a fresh `Decoded`.

use crate::codec::line_format::{deserialize_bytes_with_capacity, serialize, CodecError, Decoded};
use crate::store::note_store::{NoteStore, MAX_NOTES};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for notes file access.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Codec(CodecError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "notes file `{}`: {source}", path.display())
            }
            Self::Codec(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Codec(err) => Some(err),
        }
    }
}

impl From<CodecError> for RepoError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

/// Flat-file backed notes repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFile {
    path: PathBuf,
    capacity: usize,
}

impl NoteFile {
    /// Targets `path` with the default store capacity.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, MAX_NOTES)
    }

    /// Targets `path`; loaded stores are bounded by `capacity`.
    pub fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reads and decodes the notes file.
    ///
    /// Records that are not valid UTF-8 are skipped, not fatal.
    ///
    /// # Errors
    /// - `Io` for any read failure other than a missing file.
    /// - `Codec` when the count header is malformed.
    pub fn load(&self) -> RepoResult<Decoded> {
        let started_at = Instant::now();
        info!("event=notes_load module=repo status=start");

        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=notes_load module=repo status=ok reason=file_missing count=0 duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(Decoded::empty(self.capacity));
            }
            Err(err) => {
                error!(
                    "event=notes_load module=repo status=error error_code=read_failed duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(self.io_error(err));
            }
        };

        match deserialize_bytes_with_capacity(&bytes, self.capacity) {
            Ok(decoded) => {
                info!(
                    "event=notes_load module=repo status=ok count={} skipped={} truncated={} duration_ms={}",
                    decoded.store.len(),
                    decoded.skipped.len(),
                    decoded.truncated.is_some(),
                    started_at.elapsed().as_millis()
                );
                Ok(decoded)
            }
            Err(err) => {
                error!(
                    "event=notes_load module=repo status=error error_code=invalid_header duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Err(err.into())
            }
        }
    }

    /// Serializes `store` and overwrites the notes file.
    ///
    /// Creates the parent directory when it does not exist.
    pub fn save(&self, store: &NoteStore) -> RepoResult<()> {
        let started_at = Instant::now();
        let text = serialize(store);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }

        match std::fs::write(&self.path, text) {
            Ok(()) => {
                info!(
                    "event=notes_save module=repo status=ok count={} duration_ms={}",
                    store.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=notes_save module=repo status=error error_code=write_failed duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(self.io_error(err))
            }
        }
    }

    fn io_error(&self, source: std::io::Error) -> RepoError {
        RepoError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
