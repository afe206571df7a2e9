//! Free-text search filter for cases and tasks.
//!
//! # Responsibility
//! - Turn a raw search string into an optional identifier filter plus a
//!   case-insensitive substring needle.
//!
//! # Invariants
//! - Identifier parsing is attempted once; failure means "no id clause",
//!   never an error.
//! - An empty search string matches every row.

use uuid::Uuid;

/// Parsed search input, OR-combined by repositories:
/// `id = filter.id() OR casefold(title) contains needle [OR casefold(case_number) contains needle]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    id: Option<Uuid>,
    needle: String,
}

impl SearchFilter {
    pub fn parse(search_string: &str) -> Self {
        Self {
            id: Uuid::parse_str(search_string).ok(),
            needle: search_string.to_lowercase(),
        }
    }

    /// Identifier clause, present only when the input is a valid UUID.
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Substring to look for, lowercased with `str::to_lowercase`.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn matches_everything(&self) -> bool {
        self.needle.is_empty()
    }
}
