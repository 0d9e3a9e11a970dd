//! Keyword pattern compilation and matching.
//!
//! # Responsibility
//! - Turn a user keyword into a case-insensitive regular expression.
//! - Match a compiled pattern against a note's title and content.
//!
//! # Invariants
//! - Matching is unanchored: any match anywhere in title OR content counts.
//! - A blank keyword compiles to "no pattern" and yields no hits.
//! - Malformed patterns fail with `InvalidPattern` unless the query opts into
//!   literal fallback.

use crate::model::note::Note;
use regex::{Regex, RegexBuilder};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for search APIs.
pub type SearchResult<T> = Result<T, SearchError>;

/// Search-layer error for keyword compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Keyword is not a well-formed regular expression.
    InvalidPattern { pattern: String, message: String },
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPattern { pattern, message } => {
                write!(f, "invalid search pattern `{pattern}`: {message}")
            }
        }
    }
}

impl Error for SearchError {}

/// Search options for keyword behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// User keyword, interpreted as a regular expression.
    pub text: String,
    /// Treat a malformed pattern as a literal substring instead of failing.
    ///
    /// Default is `false`: callers see `InvalidPattern` and decide.
    pub literal_fallback: bool,
}

impl SearchQuery {
    /// Creates a strict query (malformed patterns are errors).
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            literal_fallback: false,
        }
    }

    /// Creates a query that falls back to literal matching.
    pub fn lenient(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            literal_fallback: true,
        }
    }
}

/// Compiled keyword ready for matching.
#[derive(Debug, Clone)]
pub struct KeywordPattern {
    regex: Regex,
    literal: bool,
}

impl KeywordPattern {
    /// Compiles `query`, returning `None` for blank keywords.
    pub fn compile(query: &SearchQuery) -> SearchResult<Option<Self>> {
        if query.text.trim().is_empty() {
            return Ok(None);
        }

        match build_case_insensitive(&query.text) {
            Ok(regex) => Ok(Some(Self {
                regex,
                literal: false,
            })),
            Err(_) if query.literal_fallback => {
                log::debug!(
                    "event=search_compile module=search status=fallback reason=invalid_pattern"
                );
                let regex = build_case_insensitive(&regex::escape(&query.text)).map_err(
                    |fallback_err| SearchError::InvalidPattern {
                        pattern: query.text.clone(),
                        message: fallback_err.to_string(),
                    },
                )?;
                Ok(Some(Self {
                    regex,
                    literal: true,
                }))
            }
            Err(err) => Err(SearchError::InvalidPattern {
                pattern: query.text.clone(),
                message: err.to_string(),
            }),
        }
    }

    /// Whether the keyword was downgraded to a literal substring.
    pub fn is_literal(&self) -> bool {
        self.literal
    }

    /// Returns whether the pattern occurs in the note title or content.
    pub fn matches(&self, note: &Note) -> bool {
        self.regex.is_match(note.title()) || self.regex.is_match(note.content())
    }
}

fn build_case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::{KeywordPattern, SearchError, SearchQuery};

    #[test]
    fn blank_keyword_compiles_to_none() {
        assert!(KeywordPattern::compile(&SearchQuery::new("   "))
            .unwrap()
            .is_none());
    }

    #[test]
    fn strict_query_reports_unbalanced_group() {
        let err = KeywordPattern::compile(&SearchQuery::new("(unclosed")).unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern { .. }));
    }

    #[test]
    fn lenient_query_downgrades_to_literal() {
        let pattern = KeywordPattern::compile(&SearchQuery::lenient("[draft"))
            .unwrap()
            .expect("non-blank keyword");
        assert!(pattern.is_literal());
    }

    #[test]
    fn well_formed_pattern_is_not_literal() {
        let pattern = KeywordPattern::compile(&SearchQuery::lenient("meet(ing)?"))
            .unwrap()
            .expect("non-blank keyword");
        assert!(!pattern.is_literal());
    }
}
