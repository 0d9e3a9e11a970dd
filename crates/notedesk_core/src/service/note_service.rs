//! Note use-case service.
//!
//! # Responsibility
//! - Provide the create/list/detail/edit/delete/search/filter/save/load API
//!   consumed by the presentation layer.
//! - Keep the presentation layer decoupled from store and file details.
//!
//! # Invariants
//! - Indices are 1-based display numbers.
//! - Loading decodes into a fresh store and swaps it in only on success; a
//!   failed load leaves in-memory notes untouched.
//! - Every failure is returned as `ServiceError`; nothing panics.

use crate::codec::line_format::{Decoded, SkippedRecord};
use crate::model::category::Category;
use crate::model::note::{Note, NoteValidationError};
use crate::repo::note_file::{NoteFile, RepoError};
use crate::search::pattern::{SearchError, SearchQuery};
use crate::store::note_store::{NoteHit, NoteStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Title/content rejected.
    Validation(NoteValidationError),
    /// Bad index or full store.
    Store(StoreError),
    /// Malformed search keyword.
    Search(SearchError),
    /// Notes file failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Search(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Search(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<NoteValidationError> for ServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

impl From<SearchError> for ServiceError {
    fn from(value: SearchError) -> Self {
        Self::Search(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// One field edit applied by [`NoteService::edit_note`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEdit {
    Title(String),
    Content(String),
    Category(Category),
}

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Notes now held by the service.
    pub loaded: usize,
    /// Records dropped during decode.
    pub skipped: Vec<SkippedRecord>,
    /// `(announced, found)` when the file ended early.
    pub truncated: Option<(usize, usize)>,
}

/// Note service facade over the in-memory store and the notes file.
pub struct NoteService {
    store: NoteStore,
    file: NoteFile,
}

impl NoteService {
    /// Creates a service with an empty store bound to `file`.
    ///
    /// Does not touch the file system; call [`NoteService::reload`] to load.
    pub fn new(file: NoteFile) -> Self {
        Self {
            store: NoteStore::with_capacity(file.capacity()),
            file,
        }
    }

    /// Configured notes file.
    pub fn data_file(&self) -> &Path {
        self.file.path()
    }

    /// Read-only access to the backing store.
    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// Creates a note and returns its display index.
    ///
    /// # Errors
    /// - `Store(CapacityExceeded)` when full (checked before validation).
    /// - `Validation` for blank title/content.
    pub fn create_note(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        category: Category,
    ) -> ServiceResult<usize> {
        if self.store.is_full() {
            return Err(StoreError::CapacityExceeded {
                capacity: self.store.capacity(),
            }
            .into());
        }
        let note = Note::create(title, content, category)?;
        let index = self.store.add(note)?;
        info!(
            "event=note_create module=service status=ok index={index} category={}",
            category.machine_name()
        );
        Ok(index)
    }

    /// All notes in display order.
    pub fn list_notes(&self) -> &[Note] {
        self.store.list_all()
    }

    /// The note at display `index`.
    pub fn get_note_detail(&self, index: usize) -> ServiceResult<&Note> {
        Ok(self.store.get(index)?)
    }

    /// Applies one field edit; the note is unchanged when the edit fails.
    pub fn edit_note(&mut self, index: usize, edit: NoteEdit) -> ServiceResult<&Note> {
        let field = match &edit {
            NoteEdit::Title(_) => "title",
            NoteEdit::Content(_) => "content",
            NoteEdit::Category(_) => "category",
        };
        let note = self.store.update(index, move |note| match edit {
            NoteEdit::Title(title) => note.set_title(title),
            NoteEdit::Content(content) => note.set_content(content),
            NoteEdit::Category(category) => {
                note.set_category(category);
                Ok(())
            }
        })?;
        info!("event=note_edit module=service status=ok index={index} field={field}");
        Ok(note)
    }

    /// Removes the note at `index`. Callers confirm before calling.
    pub fn delete_note(&mut self, index: usize) -> ServiceResult<Note> {
        Ok(self.store.remove(index)?)
    }

    /// Keyword search over titles and content.
    pub fn search_notes(&self, query: &SearchQuery) -> ServiceResult<Vec<NoteHit<'_>>> {
        Ok(self.store.search(query)?)
    }

    /// Notes carrying exactly `category`.
    pub fn filter_notes(&self, category: Category) -> Vec<NoteHit<'_>> {
        self.store.filter_by_category(category)
    }

    /// Saves to the configured notes file.
    pub fn save(&self) -> ServiceResult<()> {
        Ok(self.file.save(&self.store)?)
    }

    /// Replaces in-memory notes with the configured notes file.
    pub fn reload(&mut self) -> ServiceResult<LoadSummary> {
        let decoded = self.file.load()?;
        Ok(self.install(decoded))
    }

    /// Saves to an explicit path; the configured file is unchanged.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> ServiceResult<()> {
        let target = NoteFile::with_capacity(path.as_ref(), self.store.capacity());
        Ok(target.save(&self.store)?)
    }

    /// Replaces in-memory notes with the contents of `path`.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> ServiceResult<LoadSummary> {
        let source = NoteFile::with_capacity(path.as_ref(), self.store.capacity());
        let decoded = source.load()?;
        Ok(self.install(decoded))
    }

    fn install(&mut self, decoded: Decoded) -> LoadSummary {
        self.store = decoded.store;
        LoadSummary {
            loaded: self.store.len(),
            skipped: decoded.skipped,
            truncated: decoded.truncated,
        }
    }
}
