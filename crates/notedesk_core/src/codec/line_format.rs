//! Line-oriented notes format.
//!
//! ```text
//! <count>
//! <title>|<content with \n escapes>|<CATEGORY>|<yyyy-MM-dd HH:mm:ss>|<yyyy-MM-dd HH:mm:ss>
//! ```
//!
//! # Invariants
//! - Every emitted line ends with `\n`, including the last one.
//! - Newlines in content are written as the two characters `\n`.
//! - Timestamps are written with second precision; sub-second parts are
//!   dropped.
//! - A bad record is skipped and reported; later records still decode.
//! - UTF-8 is checked per line, so an undecodable record only drops itself.

use crate::model::category::Category;
use crate::model::note::{Note, NoteValidationError, FIELD_DELIMITER, FULL_TIMESTAMP_FORMAT};
use crate::store::note_store::{NoteStore, MAX_NOTES};
use chrono::NaiveDateTime;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

const FIELD_COUNT: usize = 5;
const ESCAPED_NEWLINE: &str = "\\n";

pub type CodecResult<T> = Result<T, CodecError>;

/// Whole-document decode failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// First line is not a non-negative decimal count.
    InvalidHeader(String),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHeader(line) => {
                write!(f, "invalid note count header `{line}`")
            }
        }
    }
}

impl Error for CodecError {}

/// Reason a single record was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    MissingFields { found: usize },
    InvalidEncoding { valid_up_to: usize },
    UnknownCategory(String),
    MalformedTimestamp { value: String, message: String },
    Invalid(NoteValidationError),
    OverCapacity { capacity: usize },
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields { found } => {
                write!(f, "expected {FIELD_COUNT} fields, found {found}")
            }
            Self::InvalidEncoding { valid_up_to } => {
                write!(f, "invalid UTF-8 after byte {valid_up_to}")
            }
            Self::UnknownCategory(name) => write!(f, "unknown category `{name}`"),
            Self::MalformedTimestamp { value, message } => {
                write!(f, "malformed timestamp `{value}`: {message}")
            }
            Self::Invalid(err) => write!(f, "{err}"),
            Self::OverCapacity { capacity } => {
                write!(f, "store capacity of {capacity} notes reached")
            }
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

/// A record dropped during decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based line number in the source text (the header is line 1).
    pub line: usize,
    pub reason: RecordError,
}

/// Decode output: the rebuilt store plus what was dropped on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub store: NoteStore,
    pub skipped: Vec<SkippedRecord>,
    /// `(announced, found)` when the text ends before the announced count.
    pub truncated: Option<(usize, usize)>,
}

impl Decoded {
    /// Empty result bounded by `capacity`.
    pub fn empty(capacity: usize) -> Self {
        Self {
            store: NoteStore::with_capacity(capacity),
            skipped: Vec::new(),
            truncated: None,
        }
    }
}

/// Serializes every note in display order.
pub fn serialize(store: &NoteStore) -> String {
    let mut out = format!("{}\n", store.len());
    for note in store.list_all() {
        out.push_str(&encode_note(note));
        out.push('\n');
    }
    out
}

/// Encodes one note as a single record line (without the trailing newline).
pub fn encode_note(note: &Note) -> String {
    let d = FIELD_DELIMITER;
    format!(
        "{}{d}{}{d}{}{d}{}{d}{}",
        note.title(),
        note.content().replace('\n', ESCAPED_NEWLINE),
        note.category().machine_name(),
        note.created_at().format(FULL_TIMESTAMP_FORMAT),
        note.modified_at().format(FULL_TIMESTAMP_FORMAT)
    )
}

/// Decodes notes text into a store bounded by [`MAX_NOTES`].
pub fn deserialize(text: &str) -> CodecResult<Decoded> {
    deserialize_with_capacity(text, MAX_NOTES)
}

/// Decodes notes text into a store bounded by `capacity`.
///
/// Empty text yields an empty store. Lines past the announced count are
/// ignored.
///
/// # Errors
/// - `InvalidHeader` when the first line is not a decimal count.
pub fn deserialize_with_capacity(text: &str, capacity: usize) -> CodecResult<Decoded> {
    deserialize_bytes_with_capacity(text.as_bytes(), capacity)
}

/// Decodes raw file bytes into a store bounded by `capacity`.
///
/// Same rules as [`deserialize_with_capacity`]; a record line that is not
/// valid UTF-8 is skipped as `InvalidEncoding`.
///
/// # Errors
/// - `InvalidHeader` when the first line is not a decimal count.
pub fn deserialize_bytes_with_capacity(bytes: &[u8], capacity: usize) -> CodecResult<Decoded> {
    let mut lines = split_lines(bytes);
    let Some(header) = lines.next() else {
        return Ok(Decoded::empty(capacity));
    };
    let header = String::from_utf8_lossy(header);
    let announced = header
        .trim()
        .parse::<usize>()
        .map_err(|_| CodecError::InvalidHeader(header.to_string()))?;

    let mut decoded = Decoded::empty(capacity);
    let mut found = 0;
    for (offset, line) in lines.take(announced).enumerate() {
        found += 1;
        let line_number = offset + 2;
        let outcome = std::str::from_utf8(line)
            .map_err(|err| RecordError::InvalidEncoding {
                valid_up_to: err.valid_up_to(),
            })
            .and_then(decode_note)
            .and_then(|note| {
                decoded
                    .store
                    .add(note)
                    .map_err(|_| RecordError::OverCapacity { capacity })
            });
        if let Err(reason) = outcome {
            warn!(
                "event=record_skip module=codec status=skipped line={line_number} reason={}",
                reason_code(&reason)
            );
            decoded.skipped.push(SkippedRecord {
                line: line_number,
                reason,
            });
        }
    }

    if found < announced {
        warn!(
            "event=notes_decode module=codec status=truncated announced={announced} found={found}"
        );
        decoded.truncated = Some((announced, found));
    }

    Ok(decoded)
}

/// Decodes a single record line.
pub fn decode_note(line: &str) -> Result<Note, RecordError> {
    let fields = line.split(FIELD_DELIMITER).collect::<Vec<_>>();
    if fields.len() < FIELD_COUNT {
        return Err(RecordError::MissingFields {
            found: fields.len(),
        });
    }

    let category = Category::from_machine_name(fields[2])
        .ok_or_else(|| RecordError::UnknownCategory(fields[2].to_string()))?;
    let created_at = parse_timestamp(fields[3])?;
    let modified_at = parse_timestamp(fields[4])?;
    let content = fields[1].replace(ESCAPED_NEWLINE, "\n");

    Note::restore(fields[0], content, category, created_at, modified_at)
        .map_err(RecordError::Invalid)
}

// Byte-level `str::lines`: splits on `\n`, strips one `\r` before it, and
// yields no empty line after a final newline.
fn split_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = match bytes {
        [] => None,
        [rest @ .., b'\n'] => Some(rest),
        _ => Some(bytes),
    };
    body.into_iter()
        .flat_map(|body| body.split(|byte| *byte == b'\n'))
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, RecordError> {
    NaiveDateTime::parse_from_str(value, FULL_TIMESTAMP_FORMAT).map_err(|err| {
        RecordError::MalformedTimestamp {
            value: value.to_string(),
            message: err.to_string(),
        }
    })
}

fn reason_code(reason: &RecordError) -> &'static str {
    match reason {
        RecordError::MissingFields { .. } => "missing_fields",
        RecordError::InvalidEncoding { .. } => "invalid_encoding",
        RecordError::UnknownCategory(_) => "unknown_category",
        RecordError::MalformedTimestamp { .. } => "malformed_timestamp",
        RecordError::Invalid(_) => "invalid_note",
        RecordError::OverCapacity { .. } => "over_capacity",
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_note, split_lines, RecordError};
    use crate::model::category::Category;

    #[test]
    fn decode_ignores_fields_past_the_fifth() {
        let note = decode_note("t|c|IDEAS|2024-01-01 00:00:00|2024-01-01 00:00:01|extra").unwrap();
        assert_eq!(note.category(), Category::Ideas);
    }

    #[test]
    fn decode_rejects_lowercase_category_name() {
        let err = decode_note("t|c|ideas|2024-01-01 00:00:00|2024-01-01 00:00:00").unwrap_err();
        assert_eq!(err, RecordError::UnknownCategory("ideas".to_string()));
    }

    #[test]
    fn decode_rejects_minute_precision_timestamp() {
        let err = decode_note("t|c|WORK|2024-01-01 00:00|2024-01-01 00:00:00").unwrap_err();
        assert!(matches!(err, RecordError::MalformedTimestamp { .. }));
    }

    #[test]
    fn split_lines_matches_str_lines() {
        for text in ["", "\n", "0", "0\n", "1\r\na\n", "1\na\n\n", "1\na\rb"] {
            let expected = text.lines().map(str::as_bytes).collect::<Vec<_>>();
            let actual = split_lines(text.as_bytes()).collect::<Vec<_>>();
            assert_eq!(actual, expected, "text {text:?}");
        }
    }

    #[test]
    fn decode_rejects_blank_title() {
        let err = decode_note(" |c|WORK|2024-01-01 00:00:00|2024-01-01 00:00:00").unwrap_err();
        assert!(matches!(err, RecordError::Invalid(_)));
    }
}
