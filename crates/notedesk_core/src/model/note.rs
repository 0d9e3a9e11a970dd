//! Note domain model.
//!
//! # Responsibility
//! - Define the titled, categorized, timestamped note record.
//! - Validate text fields on every write path.
//! - Render the one-line summary and the detail view.
//!
//! # Invariants
//! - `title` and `content` are never blank after trimming.
//! - `title` and `content` never contain the `|` field delimiter.
//! - `title` never contains `\n` or `\r`.
//! - `modified_at >= created_at` at all times.
//!
//! # See also
//! - `codec::line_format` for the persisted shape.

use crate::model::category::Category;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field delimiter of the notes file. Not allowed inside text fields.
pub const FIELD_DELIMITER: char = '|';
/// Timestamp format used by [`Note::render`].
pub const SUMMARY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Timestamp format used by the detail view and the notes file.
pub const FULL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DETAIL_RULE_WIDTH: usize = 50;

/// Validation failures for note fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    EmptyContent,
    DelimiterInTitle,
    DelimiterInContent,
    LineBreakInTitle,
    TimestampOrder {
        created_at: NaiveDateTime,
        modified_at: NaiveDateTime,
    },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::EmptyContent => write!(f, "content cannot be empty"),
            Self::DelimiterInTitle => {
                write!(f, "title cannot contain `{FIELD_DELIMITER}`")
            }
            Self::DelimiterInContent => {
                write!(f, "content cannot contain `{FIELD_DELIMITER}`")
            }
            Self::LineBreakInTitle => write!(f, "title cannot contain line breaks"),
            Self::TimestampOrder {
                created_at,
                modified_at,
            } => write!(
                f,
                "modified_at ({}) must be >= created_at ({})",
                modified_at.format(FULL_TIMESTAMP_FORMAT),
                created_at.format(FULL_TIMESTAMP_FORMAT)
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// A titled, categorized, timestamped text record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNote")]
pub struct Note {
    title: String,
    content: String,
    category: Category,
    created_at: NaiveDateTime,
    modified_at: NaiveDateTime,
}

/// Unvalidated serde shape; converted through [`Note::restore`].
#[derive(Deserialize)]
struct RawNote {
    title: String,
    content: String,
    category: Category,
    created_at: NaiveDateTime,
    modified_at: NaiveDateTime,
}

impl TryFrom<RawNote> for Note {
    type Error = NoteValidationError;

    fn try_from(value: RawNote) -> Result<Self, Self::Error> {
        Note::restore(
            value.title,
            value.content,
            value.category,
            value.created_at,
            value.modified_at,
        )
    }
}

impl Note {
    /// Creates a note stamped with the current local time.
    ///
    /// # Errors
    /// - Returns a validation error when `title` or `content` is blank or
    ///   contains the field delimiter, or when `title` spans several lines.
    pub fn create(
        title: impl Into<String>,
        content: impl Into<String>,
        category: Category,
    ) -> Result<Self, NoteValidationError> {
        let title = title.into();
        let content = content.into();
        validate_title(&title)?;
        validate_content(&content)?;

        let now = now();
        Ok(Self {
            title,
            content,
            category,
            created_at: now,
            modified_at: now,
        })
    }

    /// Rebuilds a note with known timestamps (file import path).
    ///
    /// Applies the same text validation as [`Note::create`] and additionally
    /// rejects `modified_at < created_at`.
    pub fn restore(
        title: impl Into<String>,
        content: impl Into<String>,
        category: Category,
        created_at: NaiveDateTime,
        modified_at: NaiveDateTime,
    ) -> Result<Self, NoteValidationError> {
        let title = title.into();
        let content = content.into();
        validate_title(&title)?;
        validate_content(&content)?;
        if modified_at < created_at {
            return Err(NoteValidationError::TimestampOrder {
                created_at,
                modified_at,
            });
        }

        Ok(Self {
            title,
            content,
            category,
            created_at,
            modified_at,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn modified_at(&self) -> NaiveDateTime {
        self.modified_at
    }

    /// Replaces the title and bumps `modified_at`.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), NoteValidationError> {
        let title = title.into();
        validate_title(&title)?;
        self.title = title;
        self.touch();
        Ok(())
    }

    /// Replaces the content and bumps `modified_at`.
    pub fn set_content(&mut self, content: impl Into<String>) -> Result<(), NoteValidationError> {
        let content = content.into();
        validate_content(&content)?;
        self.content = content;
        self.touch();
        Ok(())
    }

    /// Replaces the category and bumps `modified_at`.
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.touch();
    }

    /// One-line summary: `[<category>] <title> - Created: <yyyy-MM-dd HH:mm>`.
    pub fn render(&self) -> String {
        format!(
            "[{}] {} - Created: {}",
            self.category.display_name(),
            self.title,
            self.created_at.format(SUMMARY_TIMESTAMP_FORMAT)
        )
    }

    /// Multi-line detail view with full timestamps and the content body.
    pub fn render_detail(&self) -> String {
        let rule = "-".repeat(DETAIL_RULE_WIDTH);
        format!(
            "Title: {}\nCategory: {}\nCreated: {}\nModified: {}\n{rule}\nContent:\n{}",
            self.title,
            self.category.display_name(),
            self.created_at.format(FULL_TIMESTAMP_FORMAT),
            self.modified_at.format(FULL_TIMESTAMP_FORMAT),
            self.content
        )
    }

    // Local wall-clock time can step backwards (DST, manual clock changes);
    // clamp so the ordering invariant survives.
    fn touch(&mut self) {
        self.modified_at = now().max(self.created_at);
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn validate_title(title: &str) -> Result<(), NoteValidationError> {
    if title.trim().is_empty() {
        return Err(NoteValidationError::EmptyTitle);
    }
    if title.contains(FIELD_DELIMITER) {
        return Err(NoteValidationError::DelimiterInTitle);
    }
    if title.contains(['\n', '\r']) {
        return Err(NoteValidationError::LineBreakInTitle);
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), NoteValidationError> {
    if content.trim().is_empty() {
        return Err(NoteValidationError::EmptyContent);
    }
    if content.contains(FIELD_DELIMITER) {
        return Err(NoteValidationError::DelimiterInContent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteValidationError};
    use crate::model::category::Category;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32, second: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .expect("valid fixed timestamp")
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = Note::create("  \t", "body", Category::Work).unwrap_err();
        assert_eq!(err, NoteValidationError::EmptyTitle);
    }

    #[test]
    fn whitespace_only_content_is_rejected() {
        let err = Note::create("title", "\n\n  \n", Category::Work).unwrap_err();
        assert_eq!(err, NoteValidationError::EmptyContent);
    }

    #[test]
    fn line_break_in_title_is_rejected_on_every_write_path() {
        let err = Note::create("Plan\nQ3", "body", Category::Work).unwrap_err();
        assert_eq!(err, NoteValidationError::LineBreakInTitle);

        let err = Note::restore("Plan\rQ3", "c", Category::Work, at(9, 0, 0), at(9, 0, 0))
            .unwrap_err();
        assert_eq!(err, NoteValidationError::LineBreakInTitle);

        let mut note = Note::create("Plan", "body", Category::Work).unwrap();
        let err = note.set_title("Plan\r\nQ3").unwrap_err();
        assert_eq!(err, NoteValidationError::LineBreakInTitle);
        assert_eq!(note.title(), "Plan");
    }

    #[test]
    fn restore_rejects_modified_before_created() {
        let err = Note::restore("t", "c", Category::Ideas, at(10, 0, 0), at(9, 59, 59))
            .unwrap_err();
        assert!(matches!(err, NoteValidationError::TimestampOrder { .. }));
    }

    #[test]
    fn render_uses_minute_precision() {
        let note = Note::restore(
            "Team Meeting",
            "agenda\n",
            Category::Work,
            at(14, 5, 33),
            at(15, 0, 0),
        )
        .unwrap();
        assert_eq!(note.render(), "[Work] Team Meeting - Created: 2024-03-09 14:05");
    }

    #[test]
    fn touch_never_moves_modified_before_created() {
        let future = chrono::Local::now().naive_local() + chrono::Duration::days(1);
        let mut note = Note::restore("t", "c", Category::Personal, future, future).unwrap();
        note.set_category(Category::School);
        assert_eq!(note.modified_at(), future);
        assert_eq!(note.category(), Category::School);
    }
}
