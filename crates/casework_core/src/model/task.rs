//! Task child record.
//!
//! # Invariants
//! - `parent_case` always references exactly one case.
//! - A task never outlives its parent case (cascade delete).

use crate::model::case::CaseId;
use crate::model::timestamp::Timestamp;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a Task.
pub type TaskId = Uuid;

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_date: Option<Timestamp>,
    pub parent_case: CaseId,
}

impl Task {
    /// Creates a task with a freshly generated id under `parent_case`.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        status: impl Into<String>,
        due_date: Option<Timestamp>,
        parent_case: CaseId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            status: status.into(),
            due_date,
            parent_case,
        }
    }
}

/// Task columns a page can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSortField {
    Id,
    #[default]
    Title,
    Description,
    Status,
    DueDate,
}

impl TaskSortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::DueDate => "dueDate",
        }
    }
}

impl FromStr for TaskSortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "status" => Ok(Self::Status),
            "dueDate" => Ok(Self::DueDate),
            other => Err(other.to_string()),
        }
    }
}

impl Display for TaskSortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
