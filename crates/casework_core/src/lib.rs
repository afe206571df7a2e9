//! Case and task data-access and integrity core.
//! This crate is the single source of truth for case/task invariants.

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod dto;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use bootstrap::dataset::{ExampleData, ExampleDataSource};
pub use bootstrap::loader::{ExampleDataLoader, LoadOutcome};
pub use config::CoreConfig;
pub use dto::{CaseDto, TaskDto};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::case::{Case, CaseId, CaseSortField};
pub use model::page::{Direction, Page, PageRequest, PageRequestError, Sort};
pub use model::task::{Task, TaskId, TaskSortField};
pub use repo::case_repo::{CaseRepository, SqliteCaseRepository};
pub use repo::error::{Constraint, RepoError, RepoResult};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use search::filter::SearchFilter;
pub use service::casework_service::CaseworkService;
pub use service::error::{ErrorKind, ServiceError, ServiceResult};
pub use service::property::{CaseFieldUpdate, PropertyError, TaskFieldUpdate};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
