//! External representations of cases and tasks.
//!
//! # Responsibility
//! - Define the wire shape used by callers and by the example dataset.
//! - Hide the Case/Task object graph behind id references.
//!
//! # Invariants
//! - A case DTO lists task ids only, never nested tasks.
//! - A task DTO carries its parent as an id under the `case` key.
//! - Dates serialize as `yyyy-MM-ddTHH:mm:ss`.

pub mod convert;

use crate::model::case::CaseId;
use crate::model::task::TaskId;
use crate::model::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// Case as seen by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDto {
    /// Server-assigned; ignored on create.
    #[serde(default)]
    pub id: Option<CaseId>,
    #[serde(default)]
    pub case_number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    /// Defaults to the current local time on create.
    #[serde(default, with = "optional_timestamp")]
    pub created_date: Option<Timestamp>,
    /// Derived; must be empty on create.
    #[serde(default)]
    pub tasks: Vec<TaskId>,
}

/// Task as seen by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    #[serde(default)]
    pub id: Option<TaskId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, with = "optional_timestamp")]
    pub due_date: Option<Timestamp>,
    #[serde(rename = "case", default)]
    pub parent_case: Option<CaseId>,
}

mod optional_timestamp {
    use crate::model::timestamp::{format_timestamp, parse_timestamp, Timestamp};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&format_timestamp(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => parse_timestamp(&text)
                .map(Some)
                .map_err(|err| D::Error::custom(format!("could not parse date '{text}': {err}"))),
            None => Ok(None),
        }
    }
}
