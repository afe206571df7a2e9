//! Case and task use-case service.
//!
//! # Responsibility
//! - Create, read, update and delete cases and tasks in wire form.
//! - Run id-or-text search and single-property updates.
//!
//! # Invariants
//! - A created case never carries tasks; a created task always has an
//!   existing parent case.
//! - Page requests are validated before any store access.
//! - Batch saves stop at the first failure and keep earlier writes.
//! - Deletes are idempotent.

use crate::dto::convert::{case_from_dto, case_to_dto, task_from_dto, task_to_dto};
use crate::dto::{CaseDto, TaskDto};
use crate::model::case::{CaseId, CaseSortField};
use crate::model::page::{Page, PageRequest};
use crate::model::task::{TaskId, TaskSortField};
use crate::repo::case_repo::{CaseRepository, SqliteCaseRepository};
use crate::repo::error::{Constraint, RepoError};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::search::filter::SearchFilter;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::property::{CaseFieldUpdate, PropertyError, TaskFieldUpdate};
use log::{debug, info, warn};
use rusqlite::Connection;

/// Service facade over case and task repositories.
pub struct CaseworkService<C: CaseRepository, T: TaskRepository> {
    cases: C,
    tasks: T,
}

impl<'conn> CaseworkService<SqliteCaseRepository<'conn>, SqliteTaskRepository<'conn>> {
    /// Creates a service backed by SQLite repositories on `conn`.
    pub fn open(conn: &'conn Connection) -> ServiceResult<Self> {
        Ok(Self::new(
            SqliteCaseRepository::try_new(conn)?,
            SqliteTaskRepository::try_new(conn)?,
        ))
    }
}

impl<C: CaseRepository, T: TaskRepository> CaseworkService<C, T> {
    pub fn new(cases: C, tasks: T) -> Self {
        Self { cases, tasks }
    }

    /// Creates one case. The payload id is ignored.
    pub fn save_case(&self, dto: &CaseDto) -> ServiceResult<CaseDto> {
        if !dto.tasks.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "a new case cannot already have tasks".to_string(),
            ));
        }

        let case = case_from_dto(dto);
        let saved = self.cases.save(&case).map_err(|err| {
            if err.is_constraint(Constraint::UniqueCaseNumber) {
                warn!(
                    "event=case_save module=service status=rejected reason={}",
                    Constraint::UniqueCaseNumber.name()
                );
                ServiceError::DuplicateCaseNumber(err)
            } else {
                ServiceError::Repo(err)
            }
        })?;

        info!(
            "event=case_save module=service status=ok case_id={}",
            saved.id
        );
        Ok(case_to_dto(saved))
    }

    /// Creates cases in input order, stopping at the first failure.
    ///
    /// Cases saved before the failing element stay committed.
    pub fn save_cases(&self, dtos: &[CaseDto]) -> ServiceResult<Vec<CaseDto>> {
        let mut saved = Vec::with_capacity(dtos.len());
        for dto in dtos {
            saved.push(self.save_case(dto)?);
        }
        Ok(saved)
    }

    /// Creates one task attached to the case named by its `case` field.
    pub fn save_task(&self, dto: &TaskDto) -> ServiceResult<TaskDto> {
        let task = task_from_dto(dto, &self.cases)?;
        let saved = self.tasks.save(&task)?;

        info!(
            "event=task_save module=service status=ok task_id={} case_id={}",
            saved.id, saved.parent_case
        );
        Ok(task_to_dto(saved))
    }

    /// Creates tasks in input order, stopping at the first failure.
    pub fn save_tasks(&self, dtos: &[TaskDto]) -> ServiceResult<Vec<TaskDto>> {
        let mut saved = Vec::with_capacity(dtos.len());
        for dto in dtos {
            saved.push(self.save_task(dto)?);
        }
        Ok(saved)
    }

    pub fn get_case(&self, id: CaseId) -> ServiceResult<Option<CaseDto>> {
        Ok(self.cases.find_by_id(id)?.map(case_to_dto))
    }

    pub fn get_case_by_number(&self, case_number: &str) -> ServiceResult<Option<CaseDto>> {
        Ok(self.cases.find_by_case_number(case_number)?.map(case_to_dto))
    }

    pub fn get_task(&self, id: TaskId) -> ServiceResult<Option<TaskDto>> {
        Ok(self.tasks.find_by_id(id)?.map(task_to_dto))
    }

    /// Deletes a case and all of its tasks. Missing ids are not an error.
    pub fn delete_case(&self, id: CaseId) -> ServiceResult<()> {
        let task_count = self.tasks.find_ids_by_parent_case(id)?.len();
        let existed = self.cases.delete_by_id(id)?;
        info!(
            "event=case_delete module=service status=ok case_id={} existed={} tasks_removed={}",
            id, existed, task_count
        );
        Ok(())
    }

    /// Deletes one task. Missing ids are not an error.
    pub fn delete_task(&self, id: TaskId) -> ServiceResult<()> {
        let existed = self.tasks.delete_by_id(id)?;
        info!(
            "event=task_delete module=service status=ok task_id={} existed={}",
            id, existed
        );
        Ok(())
    }

    /// Cases matching `search_string` by exact id, title or case number.
    pub fn search_cases(
        &self,
        search_string: &str,
        page: &PageRequest<CaseSortField>,
    ) -> ServiceResult<Page<CaseDto>> {
        page.validate()?;
        let filter = SearchFilter::parse(search_string);
        let result = self.cases.search(&filter, page)?;
        debug!(
            "event=case_search module=service status=ok id_match={} page={} size={} total={}",
            filter.id().is_some(),
            page.page_number,
            page.page_size,
            result.total_elements
        );
        Ok(result.map(case_to_dto))
    }

    /// Tasks matching `search_string` by exact id or title.
    pub fn search_tasks(
        &self,
        search_string: &str,
        page: &PageRequest<TaskSortField>,
    ) -> ServiceResult<Page<TaskDto>> {
        page.validate()?;
        let filter = SearchFilter::parse(search_string);
        let result = self.tasks.search(&filter, page)?;
        debug!(
            "event=task_search module=service status=ok id_match={} page={} size={} total={}",
            filter.id().is_some(),
            page.page_number,
            page.page_size,
            result.total_elements
        );
        Ok(result.map(task_to_dto))
    }

    /// Page of tasks belonging to `parent_case`. An unknown case yields an
    /// empty page.
    pub fn get_tasks_for_parent(
        &self,
        parent_case: CaseId,
        page: &PageRequest<TaskSortField>,
    ) -> ServiceResult<Page<TaskDto>> {
        page.validate()?;
        let result = self.tasks.find_all_by_parent_case(parent_case, page)?;
        Ok(result.map(task_to_dto))
    }

    /// Sets one case property by name and returns the stored case.
    pub fn update_case_property(
        &self,
        id: CaseId,
        property: &str,
        value: &str,
    ) -> ServiceResult<CaseDto> {
        let mut case = self
            .cases
            .find_by_id(id)?
            .ok_or(ServiceError::CaseNotFound(id))?;

        let update = CaseFieldUpdate::parse(property, value)?;
        let property = update.property();
        update.apply(&mut case);

        let saved = self.cases.save(&case).map_err(|err| {
            log_rejected_update("case", property, &err);
            ServiceError::Repo(err)
        })?;
        info!(
            "event=case_update module=service status=ok case_id={} property={}",
            saved.id, property
        );
        Ok(case_to_dto(saved))
    }

    /// Sets one task property by name and returns the stored task.
    ///
    /// Re-pointing `parentCase` moves the task to the end of the new case's
    /// task list.
    pub fn update_task_property(
        &self,
        id: TaskId,
        property: &str,
        value: &str,
    ) -> ServiceResult<TaskDto> {
        let mut task = self
            .tasks
            .find_by_id(id)?
            .ok_or(ServiceError::TaskNotFound(id))?;

        let update = TaskFieldUpdate::parse(property, value)?;
        if let TaskFieldUpdate::ParentCase(parent_case) = update {
            if !self.cases.exists_by_id(parent_case)? {
                return Err(PropertyError::ParentCaseNotFound(parent_case).into());
            }
        }
        let property = update.property();
        update.apply(&mut task);

        let saved = self.tasks.save(&task).map_err(|err| {
            log_rejected_update("task", property, &err);
            ServiceError::Repo(err)
        })?;
        info!(
            "event=task_update module=service status=ok task_id={} property={}",
            saved.id, property
        );
        Ok(task_to_dto(saved))
    }
}

fn log_rejected_update(entity: &str, property: &str, err: &RepoError) {
    if let RepoError::ConstraintViolation { constraint, .. } = err {
        warn!(
            "event={entity}_update module=service status=rejected property={} reason={}",
            property,
            constraint.name()
        );
    }
}
