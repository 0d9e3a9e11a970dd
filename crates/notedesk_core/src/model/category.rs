//! Closed category set for notes.
//!
//! # Responsibility
//! - Define the fixed labels a note can carry.
//! - Map each label to its persisted machine name and its display label.
//!
//! # Invariants
//! - Name/label resolution is a total `match`; adding a variant without a
//!   name is a compile error, never a silent lookup miss.
//! - Machine names are part of the on-disk format and must not change.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Label classifying a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Personal,
    Work,
    School,
    Ideas,
    Reminders,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Category; 5] = [
        Category::Personal,
        Category::Work,
        Category::School,
        Category::Ideas,
        Category::Reminders,
    ];

    /// Stable name written to the notes file.
    pub fn machine_name(self) -> &'static str {
        match self {
            Self::Personal => "PERSONAL",
            Self::Work => "WORK",
            Self::School => "SCHOOL",
            Self::Ideas => "IDEAS",
            Self::Reminders => "REMINDERS",
        }
    }

    /// Human-facing label.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Work => "Work",
            Self::School => "School",
            Self::Ideas => "Ideas",
            Self::Reminders => "Reminders",
        }
    }

    /// Resolves a persisted machine name. Matching is exact.
    pub fn from_machine_name(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.machine_name() == value)
    }

    /// Resolves a 1-based menu position.
    pub fn from_position(position: usize) -> Option<Self> {
        position
            .checked_sub(1)
            .and_then(|offset| Self::ALL.get(offset).copied())
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn machine_names_resolve_back_to_the_same_variant() {
        for category in Category::ALL {
            assert_eq!(
                Category::from_machine_name(category.machine_name()),
                Some(category)
            );
        }
    }

    #[test]
    fn machine_name_lookup_is_case_sensitive() {
        assert_eq!(Category::from_machine_name("work"), None);
        assert_eq!(Category::from_machine_name("Work"), None);
        assert_eq!(Category::from_machine_name("WORK"), Some(Category::Work));
    }

    #[test]
    fn position_lookup_is_one_based() {
        assert_eq!(Category::from_position(0), None);
        assert_eq!(Category::from_position(1), Some(Category::Personal));
        assert_eq!(Category::from_position(5), Some(Category::Reminders));
        assert_eq!(Category::from_position(6), None);
    }
}
