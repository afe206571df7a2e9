//! Repository error type shared by case and task persistence.

use crate::db::DbError;
use rusqlite::ffi;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level integrity constraints that writes can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// `cases.case_number` must be unique, empty string included.
    UniqueCaseNumber,
    /// `tasks.parent_case` must reference an existing case.
    TaskParentCase,
}

impl Constraint {
    pub fn name(self) -> &'static str {
        match self {
            Self::UniqueCaseNumber => "unique_case_number",
            Self::TaskParentCase => "task_parent_case",
        }
    }
}

/// Repository error for case/task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A write was rejected by a store constraint at commit time.
    ConstraintViolation {
        constraint: Constraint,
        message: String,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl RepoError {
    pub fn is_constraint(&self, expected: Constraint) -> bool {
        matches!(self, Self::ConstraintViolation { constraint, .. } if *constraint == expected)
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ConstraintViolation {
                constraint,
                message,
            } => write!(
                f,
                "constraint violation `{}`: {message}",
                constraint.name()
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Classifies a failed write, surfacing known constraint violations.
pub(crate) fn map_write_error(err: rusqlite::Error) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            let constraint = match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE => Some(Constraint::UniqueCaseNumber),
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Constraint::TaskParentCase),
                _ => None,
            };
            if let Some(constraint) = constraint {
                return RepoError::ConstraintViolation {
                    constraint,
                    message: message
                        .clone()
                        .unwrap_or_else(|| failure.to_string()),
                };
            }
        }
    }
    RepoError::from(err)
}
