//! Seeding and teardown of the example dataset.

use crate::bootstrap::dataset::ExampleDataSource;
use crate::repo::case_repo::CaseRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::casework_service::CaseworkService;
use crate::service::error::{ServiceError, ServiceResult};
use log::info;
use serde::Serialize;

/// Result of a seeding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum LoadOutcome {
    Loaded { cases: usize, tasks: usize },
    /// A case number from the dataset was already stored; nothing more was written.
    AlreadyLoaded,
}

/// Loads or removes the example dataset through the domain service.
pub struct ExampleDataLoader<'svc, C: CaseRepository, T: TaskRepository> {
    service: &'svc CaseworkService<C, T>,
    source: ExampleDataSource,
}

impl<'svc, C: CaseRepository, T: TaskRepository> ExampleDataLoader<'svc, C, T> {
    pub fn new(service: &'svc CaseworkService<C, T>, source: ExampleDataSource) -> Self {
        Self { service, source }
    }

    /// Saves every example case, then attaches each task group to the case
    /// with the matching number.
    ///
    /// Both files are read before anything is written. A duplicate case
    /// number means the data is already present and reports `AlreadyLoaded`.
    pub fn load_test_data(&self) -> ServiceResult<LoadOutcome> {
        let data = self.source.load()?;

        match self.service.save_cases(&data.cases) {
            Ok(_) => {}
            Err(err) if err.is_duplicate_case_number() => {
                info!("event=test_data_load module=bootstrap status=skipped reason=already_loaded");
                return Ok(LoadOutcome::AlreadyLoaded);
            }
            Err(err) => return Err(err),
        }

        let mut task_count = 0;
        for (case_number, tasks) in &data.tasks {
            let parent = self
                .service
                .get_case_by_number(case_number)?
                .and_then(|case| case.id)
                .ok_or_else(|| ServiceError::CaseNumberNotFound(case_number.clone()))?;

            for task in tasks {
                let mut task = task.clone();
                task.parent_case = Some(parent);
                self.service.save_task(&task)?;
                task_count += 1;
            }
        }

        info!(
            "event=test_data_load module=bootstrap status=ok cases={} tasks={}",
            data.cases.len(),
            task_count
        );
        Ok(LoadOutcome::Loaded {
            cases: data.cases.len(),
            tasks: task_count,
        })
    }

    /// Deletes every stored case whose number is in the dataset, with its
    /// tasks. Returns how many cases were removed.
    pub fn clear_test_data(&self) -> ServiceResult<usize> {
        let data = self.source.load()?;

        let mut removed = 0;
        for case_number in data.case_numbers() {
            if let Some(id) = self
                .service
                .get_case_by_number(case_number)?
                .and_then(|case| case.id)
            {
                self.service.delete_case(id)?;
                removed += 1;
            }
        }

        info!(
            "event=test_data_clear module=bootstrap status=ok cases={}",
            removed
        );
        Ok(removed)
    }
}
