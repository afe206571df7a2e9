//! Route-level API over the casework core.
//!
//! # Responsibility
//! - Expose one function per HTTP route of the case/task surface.
//! - Translate core error kinds into response status codes.
//!
//! # Invariants
//! - Functions never panic; every outcome is an `ApiResponse`.
//! - Bodies are UTF-8 JSON, or empty for deletes.
//! - Status mapping: invalid input 400, missing entity 404, constraint 409,
//!   anything else 500.

use casework_core::db::open_db;
use casework_core::model::timestamp::now_local;
use casework_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CaseDto, CaseSortField, CaseworkService, CoreConfig, ErrorKind, ExampleDataLoader,
    ExampleDataSource, PageRequest, ServiceError, ServiceResult, Sort, SqliteCaseRepository,
    SqliteTaskRepository, TaskDto,
};
use log::error;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_CONFLICT: u16 = 409;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

const EXAMPLE_CASE_ID: &str = "88f3823a-6927-41e8-9f39-a8f93a825630";

type Service<'conn> = CaseworkService<SqliteCaseRepository<'conn>, SqliteTaskRepository<'conn>>;

/// Status-coded response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: u16,
    message: &'a str,
}

#[derive(Serialize)]
struct ClearReport {
    removed: usize,
}

impl ApiResponse {
    fn ok_json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status: STATUS_OK,
                body,
            },
            Err(err) => Self::error(STATUS_INTERNAL_ERROR, &format!("serialization failed: {err}")),
        }
    }

    fn ok_empty() -> Self {
        Self {
            status: STATUS_OK,
            body: String::new(),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        let body = serde_json::to_string(&ErrorBody { status, message })
            .unwrap_or_else(|_| String::new());
        Self { status, body }
    }

    fn from_service_error(route: &str, err: &ServiceError) -> Self {
        let status = status_for(err.kind());
        if status == STATUS_INTERNAL_ERROR {
            error!("event=api_request module=api status=error route={route} http_status={status}");
        }
        Self::error(status, &err.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Response status for one error kind.
pub fn status_for(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::InvalidArgument => STATUS_BAD_REQUEST,
        ErrorKind::NotFound => STATUS_NOT_FOUND,
        ErrorKind::ConstraintViolation => STATUS_CONFLICT,
        ErrorKind::Fatal => STATUS_INTERNAL_ERROR,
    }
}

/// Health-check probe.
pub fn ping() -> String {
    ping_inner().to_owned()
}

pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Starts core logging; returns an empty string on success and the error
/// message otherwise. Idempotent for the same `level + log_dir`.
pub fn init_logging(level: &str, log_dir: &str) -> String {
    match init_logging_inner(level, log_dir) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Route handlers bound to one database file and one example dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseworkApi {
    db_path: PathBuf,
    example_data: ExampleDataSource,
}

impl CaseworkApi {
    pub fn new(db_path: impl Into<PathBuf>, example_data: ExampleDataSource) -> Self {
        Self {
            db_path: db_path.into(),
            example_data,
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.db_path.clone(), config.example_data_source())
    }

    pub fn from_env() -> Self {
        Self::from_config(&CoreConfig::from_env())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// `POST /case`
    pub fn create_case(&self, body: &str) -> ApiResponse {
        let dto: CaseDto = match parse_body(body) {
            Ok(dto) => dto,
            Err(response) => return response,
        };
        self.respond("create_case", |service| service.save_case(&dto))
    }

    /// `GET /case/{id}`
    pub fn get_case(&self, id: &str) -> ApiResponse {
        let id = match parse_id(id) {
            Ok(id) => id,
            Err(response) => return response,
        };
        self.respond("get_case", |service| {
            service
                .get_case(id)?
                .ok_or(ServiceError::CaseNotFound(id))
        })
    }

    /// `DELETE /case/{id}`
    pub fn delete_case(&self, id: &str) -> ApiResponse {
        let id = match parse_id(id) {
            Ok(id) => id,
            Err(response) => return response,
        };
        self.respond_empty("delete_case", |service| service.delete_case(id))
    }

    /// `POST /case/list`
    pub fn create_cases(&self, body: &str) -> ApiResponse {
        let dtos: Vec<CaseDto> = match parse_body(body) {
            Ok(dtos) => dtos,
            Err(response) => return response,
        };
        self.respond("create_cases", |service| service.save_cases(&dtos))
    }

    /// `POST /case/{id}/{property}?value=`
    pub fn update_case_property(&self, id: &str, property: &str, value: &str) -> ApiResponse {
        let id = match parse_id(id) {
            Ok(id) => id,
            Err(response) => return response,
        };
        self.respond("update_case_property", |service| {
            service.update_case_property(id, property, value)
        })
    }

    /// `POST /case/search?searchString=&pageNumber=&pageSize=[&sort=]`
    pub fn search_cases(
        &self,
        search_string: &str,
        page_number: i64,
        page_size: i64,
        sort: Option<&str>,
    ) -> ApiResponse {
        let mut page = PageRequest::<CaseSortField>::of(page_number, page_size);
        if let Some(spec) = sort.filter(|spec| !spec.trim().is_empty()) {
            match Sort::parse(spec) {
                Ok(sort) => page = page.with_sort(sort),
                Err(err) => return ApiResponse::error(STATUS_BAD_REQUEST, &err.to_string()),
            }
        }
        self.respond("search_cases", |service| {
            service.search_cases(search_string, &page)
        })
    }

    /// `POST /task`
    pub fn create_task(&self, body: &str) -> ApiResponse {
        let dto: TaskDto = match parse_body(body) {
            Ok(dto) => dto,
            Err(response) => return response,
        };
        self.respond("create_task", |service| service.save_task(&dto))
    }

    /// `GET /task/{id}`
    pub fn get_task(&self, id: &str) -> ApiResponse {
        let id = match parse_id(id) {
            Ok(id) => id,
            Err(response) => return response,
        };
        self.respond("get_task", |service| {
            service
                .get_task(id)?
                .ok_or(ServiceError::TaskNotFound(id))
        })
    }

    /// `DELETE /task/{id}`
    pub fn delete_task(&self, id: &str) -> ApiResponse {
        let id = match parse_id(id) {
            Ok(id) => id,
            Err(response) => return response,
        };
        self.respond_empty("delete_task", |service| service.delete_task(id))
    }

    /// `POST /task/{id}/{property}?value=`
    pub fn update_task_property(&self, id: &str, property: &str, value: &str) -> ApiResponse {
        let id = match parse_id(id) {
            Ok(id) => id,
            Err(response) => return response,
        };
        self.respond("update_task_property", |service| {
            service.update_task_property(id, property, value)
        })
    }

    /// `GET /task/forCase/{id}?pageNumber=&pageSize=`
    pub fn tasks_for_case(&self, id: &str, page_number: i64, page_size: i64) -> ApiResponse {
        let id = match parse_id(id) {
            Ok(id) => id,
            Err(response) => return response,
        };
        self.respond("tasks_for_case", |service| {
            service.get_tasks_for_parent(id, &PageRequest::of(page_number, page_size))
        })
    }

    /// `GET /get-example-case`; a fixed sample, not read from the store.
    pub fn get_example_case(&self) -> ApiResponse {
        ApiResponse::ok_json(&CaseDto {
            id: Uuid::parse_str(EXAMPLE_CASE_ID).ok(),
            case_number: "ABC12345".to_string(),
            title: "Case Title".to_string(),
            description: "Case Description".to_string(),
            status: "Case Status".to_string(),
            created_date: Some(now_local()),
            tasks: Vec::new(),
        })
    }

    /// `POST /testData`; reports 200 when the data is already present.
    pub fn load_test_data(&self) -> ApiResponse {
        self.respond("load_test_data", |service| {
            ExampleDataLoader::new(service, self.example_data.clone()).load_test_data()
        })
    }

    /// `POST /clearTestData`
    pub fn clear_test_data(&self) -> ApiResponse {
        self.respond("clear_test_data", |service| {
            ExampleDataLoader::new(service, self.example_data.clone())
                .clear_test_data()
                .map(|removed| ClearReport { removed })
        })
    }

    fn respond<T: Serialize>(
        &self,
        route: &str,
        f: impl FnOnce(&Service<'_>) -> ServiceResult<T>,
    ) -> ApiResponse {
        match self.with_service(f) {
            Ok(value) => ApiResponse::ok_json(&value),
            Err(err) => ApiResponse::from_service_error(route, &err),
        }
    }

    fn respond_empty(
        &self,
        route: &str,
        f: impl FnOnce(&Service<'_>) -> ServiceResult<()>,
    ) -> ApiResponse {
        match self.with_service(f) {
            Ok(()) => ApiResponse::ok_empty(),
            Err(err) => ApiResponse::from_service_error(route, &err),
        }
    }

    fn with_service<T>(
        &self,
        f: impl FnOnce(&Service<'_>) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let conn = open_db(&self.db_path).map_err(|err| ServiceError::Repo(err.into()))?;
        let service = CaseworkService::open(&conn)?;
        f(&service)
    }
}

fn parse_id(value: &str) -> Result<Uuid, ApiResponse> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        ApiResponse::error(
            STATUS_BAD_REQUEST,
            &format!("could not parse identifier '{value}'"),
        )
    })
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiResponse> {
    serde_json::from_str(body).map_err(|err| {
        ApiResponse::error(STATUS_BAD_REQUEST, &format!("malformed request body: {err}"))
    })
}
