//! Domain service error and its caller-facing classification.

use crate::dto::convert::ConvertError;
use crate::model::case::CaseId;
use crate::model::page::PageRequestError;
use crate::model::task::TaskId;
use crate::repo::error::{Constraint, RepoError};
use crate::service::property::PropertyError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-facing error classes. The boundary maps each to one response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; the caller must fix the request.
    InvalidArgument,
    /// A mandatory referenced entity does not exist.
    NotFound,
    /// A store constraint rejected the write.
    ConstraintViolation,
    /// Unrecoverable failure of this single operation.
    Fatal,
}

/// Errors from domain service and bootstrap operations.
#[derive(Debug)]
pub enum ServiceError {
    InvalidArgument(String),
    /// Duplicate case number on case creation, reported as invalid input.
    DuplicateCaseNumber(RepoError),
    CaseNotFound(CaseId),
    CaseNumberNotFound(String),
    TaskNotFound(TaskId),
    Repo(RepoError),
    /// Example data resource could not be read.
    Resource {
        name: String,
        source: std::io::Error,
    },
    /// Example data resource is not valid JSON of the expected shape.
    Serialization {
        name: String,
        source: serde_json::Error,
    },
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) | Self::DuplicateCaseNumber(_) => ErrorKind::InvalidArgument,
            Self::CaseNotFound(_) | Self::CaseNumberNotFound(_) | Self::TaskNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Repo(RepoError::ConstraintViolation { .. }) => ErrorKind::ConstraintViolation,
            Self::Repo(_) | Self::Resource { .. } | Self::Serialization { .. } => ErrorKind::Fatal,
        }
    }

    /// Whether this error stems from the case-number uniqueness constraint,
    /// whether it surfaced wrapped (create) or raw (property update).
    pub fn is_duplicate_case_number(&self) -> bool {
        match self {
            Self::DuplicateCaseNumber(_) => true,
            Self::Repo(err) => err.is_constraint(Constraint::UniqueCaseNumber),
            _ => false,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "{message}"),
            Self::DuplicateCaseNumber(err) => write!(f, "constraint violation: {err}"),
            Self::CaseNotFound(id) => write!(f, "case not found '{id}'"),
            Self::CaseNumberNotFound(number) => {
                write!(f, "case not found for case number '{number}'")
            }
            Self::TaskNotFound(id) => write!(f, "task not found '{id}'"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Resource { name, source } => {
                write!(f, "could not read resource `{name}`: {source}")
            }
            Self::Serialization { name, source } => {
                write!(f, "could not parse resource `{name}`: {source}")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DuplicateCaseNumber(err) | Self::Repo(err) => Some(err),
            Self::Resource { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ConvertError> for ServiceError {
    fn from(value: ConvertError) -> Self {
        match value {
            ConvertError::MissingParentCase => {
                Self::InvalidArgument("parent case is missing".to_string())
            }
            ConvertError::ParentCaseNotFound(id) => Self::CaseNotFound(id),
            ConvertError::Repo(err) => Self::Repo(err),
        }
    }
}

impl From<PropertyError> for ServiceError {
    fn from(value: PropertyError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

impl From<PageRequestError> for ServiceError {
    fn from(value: PageRequestError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}
