//! Example dataset sources.

use crate::dto::{CaseDto, TaskDto};
use crate::service::error::{ServiceError, ServiceResult};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const CASES_FILE: &str = "example-cases.json";
pub const TASKS_FILE: &str = "example-tasks.json";

const BUNDLED_CASES: &str = include_str!("../../resources/example-cases.json");
const BUNDLED_TASKS: &str = include_str!("../../resources/example-tasks.json");

/// Example cases plus their tasks grouped by case number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleData {
    pub cases: Vec<CaseDto>,
    pub tasks: BTreeMap<String, Vec<TaskDto>>,
}

impl ExampleData {
    pub fn case_numbers(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|case| case.case_number.as_str())
    }
}

/// Where the example dataset is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExampleDataSource {
    /// Files compiled into the crate.
    #[default]
    Bundled,
    /// A directory holding `example-cases.json` and `example-tasks.json`.
    Directory(PathBuf),
}

impl ExampleDataSource {
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        dir.map_or(Self::Bundled, Self::Directory)
    }

    /// Reads and parses both files. Nothing is returned unless both parse.
    pub fn load(&self) -> ServiceResult<ExampleData> {
        Ok(ExampleData {
            cases: self.read_json(CASES_FILE)?,
            tasks: self.read_json(TASKS_FILE)?,
        })
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> ServiceResult<T> {
        let (label, text) = match self {
            Self::Bundled => {
                let text = if name == CASES_FILE {
                    BUNDLED_CASES
                } else {
                    BUNDLED_TASKS
                };
                (name.to_string(), text.to_string())
            }
            Self::Directory(dir) => {
                let path = dir.join(name);
                let label = path.display().to_string();
                let text = std::fs::read_to_string(&path).map_err(|source| {
                    ServiceError::Resource {
                        name: label.clone(),
                        source,
                    }
                })?;
                (label, text)
            }
        };

        serde_json::from_str(&text)
            .map_err(|source| ServiceError::Serialization { name: label, source })
    }
}
