//! Conversions between persisted records and DTOs.
//!
//! # Invariants
//! - Creation-direction conversions always assign a fresh server id.
//! - A task's parent id is resolved against the store before use.

use crate::dto::{CaseDto, TaskDto};
use crate::model::case::{Case, CaseId};
use crate::model::task::Task;
use crate::model::timestamp::now_local;
use crate::repo::case_repo::CaseRepository;
use crate::repo::error::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from resolving a DTO into a persistable record.
#[derive(Debug)]
pub enum ConvertError {
    /// Task payload has no `case` reference.
    MissingParentCase,
    /// Task payload references a case that does not exist.
    ParentCaseNotFound(CaseId),
    Repo(RepoError),
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingParentCase => write!(f, "parent case is missing"),
            Self::ParentCaseNotFound(id) => write!(f, "parent case not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConvertError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ConvertError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub fn case_to_dto(case: Case) -> CaseDto {
    CaseDto {
        id: Some(case.id),
        case_number: case.case_number,
        title: case.title,
        description: case.description,
        status: case.status,
        created_date: Some(case.created_date),
        tasks: case.tasks,
    }
}

pub fn task_to_dto(task: Task) -> TaskDto {
    TaskDto {
        id: Some(task.id),
        title: task.title,
        description: task.description,
        status: task.status,
        due_date: task.due_date,
        parent_case: Some(task.parent_case),
    }
}

/// Builds a new case from a create payload.
///
/// The payload id and task list are not carried over.
pub fn case_from_dto(dto: &CaseDto) -> Case {
    Case::new(
        dto.case_number.as_str(),
        dto.title.as_str(),
        dto.description.as_str(),
        dto.status.as_str(),
        dto.created_date.unwrap_or_else(now_local),
    )
}

/// Builds a new task from a create payload, resolving its parent case.
pub fn task_from_dto<C: CaseRepository>(dto: &TaskDto, cases: &C) -> Result<Task, ConvertError> {
    let parent_case = dto.parent_case.ok_or(ConvertError::MissingParentCase)?;
    if !cases.exists_by_id(parent_case)? {
        return Err(ConvertError::ParentCaseNotFound(parent_case));
    }

    Ok(Task::new(
        dto.title.as_str(),
        dto.description.as_str(),
        dto.status.as_str(),
        dto.due_date,
        parent_case,
    ))
}
