//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define parameterized data access contracts for cases and tasks.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository constructors reject connections that are not fully migrated.
//! - Constraint failures surface as `RepoError::ConstraintViolation`, never
//!   as opaque SQLite errors.

pub mod case_repo;
pub mod error;
mod schema;
pub mod task_repo;
