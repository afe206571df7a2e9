//! Case aggregate root.
//!
//! # Responsibility
//! - Define the persisted Case record and its sortable fields.
//!
//! # Invariants
//! - `id` is server-generated and never reused for another case.
//! - `case_number` is globally unique, empty string included.
//! - `tasks` is a read-time view over tasks by parent; it is never persisted.

use crate::model::task::TaskId;
use crate::model::timestamp::Timestamp;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a Case.
pub type CaseId = Uuid;

/// Persisted case record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub id: CaseId,
    /// Business reference, unique across all cases.
    pub case_number: String,
    pub title: String,
    pub description: String,
    /// Free text; no enumeration is enforced.
    pub status: String,
    pub created_date: Timestamp,
    /// Child task ids in attachment order, loaded by the repository.
    pub tasks: Vec<TaskId>,
}

impl Case {
    /// Creates a case with a freshly generated id and no tasks.
    pub fn new(
        case_number: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        status: impl Into<String>,
        created_date: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            case_number: case_number.into(),
            title: title.into(),
            description: description.into(),
            status: status.into(),
            created_date,
            tasks: Vec::new(),
        }
    }
}

/// Case columns a page can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseSortField {
    Id,
    CaseNumber,
    #[default]
    Title,
    Description,
    Status,
    CreatedDate,
}

impl CaseSortField {
    /// Wire property name of this field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::CaseNumber => "caseNumber",
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::CreatedDate => "createdDate",
        }
    }
}

impl FromStr for CaseSortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "id" => Ok(Self::Id),
            "caseNumber" => Ok(Self::CaseNumber),
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "status" => Ok(Self::Status),
            "createdDate" => Ok(Self::CreatedDate),
            other => Err(other.to_string()),
        }
    }
}

impl Display for CaseSortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
