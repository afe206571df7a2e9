//! Single-field updates addressed by property name.
//!
//! # Responsibility
//! - Parse `(property, value)` pairs into typed per-entity field updates.
//! - Apply a parsed update to a record in place.
//!
//! # Invariants
//! - Only allow-listed property names parse; anything else is
//!   `PropertyError::UnknownProperty`.
//! - Parsing never touches the record, so a failed update leaves it unchanged.

use crate::model::case::{Case, CaseId};
use crate::model::task::Task;
use crate::model::timestamp::{parse_timestamp, Timestamp};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Property names accepted by case updates.
pub const CASE_PROPERTIES: &[&str] = &["status", "description", "title", "caseNumber", "createdDate"];

/// Property names accepted by task updates.
pub const TASK_PROPERTIES: &[&str] = &["status", "description", "title", "dueDate", "parentCase"];

/// Errors from parsing a named property update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    UnknownProperty(String),
    InvalidDate(String),
    InvalidIdentifier(String),
    /// `parentCase` names a case that does not exist.
    ParentCaseNotFound(CaseId),
}

impl Display for PropertyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownProperty(name) => {
                write!(f, "cannot find modifiable property '{name}'")
            }
            Self::InvalidDate(value) => write!(f, "could not parse date '{value}'"),
            Self::InvalidIdentifier(value) => write!(f, "could not parse identifier '{value}'"),
            Self::ParentCaseNotFound(id) => write!(f, "parent case not found '{id}'"),
        }
    }
}

impl Error for PropertyError {}

/// One parsed case field assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseFieldUpdate {
    Status(String),
    Description(String),
    Title(String),
    CaseNumber(String),
    CreatedDate(Timestamp),
}

impl CaseFieldUpdate {
    pub fn parse(property: &str, value: &str) -> Result<Self, PropertyError> {
        match property {
            "status" => Ok(Self::Status(value.to_string())),
            "description" => Ok(Self::Description(value.to_string())),
            "title" => Ok(Self::Title(value.to_string())),
            "caseNumber" => Ok(Self::CaseNumber(value.to_string())),
            "createdDate" => parse_date(value).map(Self::CreatedDate),
            other => Err(PropertyError::UnknownProperty(other.to_string())),
        }
    }

    pub fn property(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::Description(_) => "description",
            Self::Title(_) => "title",
            Self::CaseNumber(_) => "caseNumber",
            Self::CreatedDate(_) => "createdDate",
        }
    }

    pub fn apply(self, case: &mut Case) {
        match self {
            Self::Status(value) => case.status = value,
            Self::Description(value) => case.description = value,
            Self::Title(value) => case.title = value,
            Self::CaseNumber(value) => case.case_number = value,
            Self::CreatedDate(value) => case.created_date = value,
        }
    }
}

/// One parsed task field assignment.
///
/// `ParentCase` only checks the identifier format; the caller verifies the
/// case exists before applying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFieldUpdate {
    Status(String),
    Description(String),
    Title(String),
    DueDate(Timestamp),
    ParentCase(CaseId),
}

impl TaskFieldUpdate {
    pub fn parse(property: &str, value: &str) -> Result<Self, PropertyError> {
        match property {
            "status" => Ok(Self::Status(value.to_string())),
            "description" => Ok(Self::Description(value.to_string())),
            "title" => Ok(Self::Title(value.to_string())),
            "dueDate" => parse_date(value).map(Self::DueDate),
            "parentCase" => Uuid::parse_str(value.trim())
                .map(Self::ParentCase)
                .map_err(|_| PropertyError::InvalidIdentifier(value.to_string())),
            other => Err(PropertyError::UnknownProperty(other.to_string())),
        }
    }

    pub fn property(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::Description(_) => "description",
            Self::Title(_) => "title",
            Self::DueDate(_) => "dueDate",
            Self::ParentCase(_) => "parentCase",
        }
    }

    pub fn apply(self, task: &mut Task) {
        match self {
            Self::Status(value) => task.status = value,
            Self::Description(value) => task.description = value,
            Self::Title(value) => task.title = value,
            Self::DueDate(value) => task.due_date = Some(value),
            Self::ParentCase(value) => task.parent_case = value,
        }
    }
}

fn parse_date(value: &str) -> Result<Timestamp, PropertyError> {
    parse_timestamp(value).map_err(|_| PropertyError::InvalidDate(value.to_string()))
}
