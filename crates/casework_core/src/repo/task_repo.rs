//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide find/exists/save/delete/search over the `tasks` table.
//! - Own attachment order of tasks within their parent case.
//!
//! # Invariants
//! - `save` is an upsert keyed by `id`.
//! - A task gets the next `position` of its parent when first attached or
//!   when re-pointed to another case; other updates keep its position.
//! - A missing parent fails with `ConstraintViolation(TaskParentCase)`.

use crate::model::case::CaseId;
use crate::model::page::{Page, PageRequest};
use crate::model::task::{Task, TaskId, TaskSortField};
use crate::model::timestamp::{format_timestamp, parse_timestamp};
use crate::repo::error::{map_write_error, RepoError, RepoResult};
use crate::repo::schema::ensure_connection_ready;
use crate::search::filter::SearchFilter;
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction,
    TransactionBehavior,
};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    status,
    due_date,
    parent_case
FROM tasks";

const TASK_COLUMNS: &[&str] = &[
    "id",
    "title",
    "description",
    "status",
    "due_date",
    "parent_case",
    "position",
];

/// Repository interface for task persistence.
pub trait TaskRepository {
    fn find_by_id(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn exists_by_id(&self, id: TaskId) -> RepoResult<bool>;
    /// Inserts or updates by id and returns the stored row.
    fn save(&self, task: &Task) -> RepoResult<Task>;
    /// Returns whether a task row existed.
    fn delete_by_id(&self, id: TaskId) -> RepoResult<bool>;
    fn find_all_by_parent_case(
        &self,
        parent_case: CaseId,
        page: &PageRequest<TaskSortField>,
    ) -> RepoResult<Page<Task>>;
    /// Task ids of one case in attachment order.
    fn find_ids_by_parent_case(&self, parent_case: CaseId) -> RepoResult<Vec<TaskId>>;
    fn search(
        &self,
        filter: &SearchFilter,
        page: &PageRequest<TaskSortField>,
    ) -> RepoResult<Page<Task>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "tasks", TASK_COLUMNS)?;
        Ok(Self { conn })
    }

    fn load_page(
        &self,
        where_sql: &str,
        bind_values: Vec<Value>,
        page: &PageRequest<TaskSortField>,
    ) -> RepoResult<Page<Task>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;

        let total: i64 = tx.query_row(
            &format!("SELECT COUNT(*) FROM tasks {where_sql};"),
            params_from_iter(bind_values.iter()),
            |row| row.get(0),
        )?;

        let sql = format!(
            "{TASK_SELECT_SQL}
             {where_sql}
             ORDER BY {} {}, id ASC
             LIMIT ? OFFSET ?;",
            task_sort_column(page.sort.field),
            page.sort.direction.as_sql()
        );
        let mut values = bind_values;
        values.push(Value::Integer(page.page_size));
        values.push(Value::Integer(page.offset()));

        let mut tasks = Vec::new();
        {
            let mut stmt = tx.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(values))?;
            while let Some(row) = rows.next()? {
                tasks.push(parse_task_row(row)?);
            }
        }
        tx.commit()?;

        Ok(Page::new(tasks, page, total.max(0) as u64))
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn find_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.conn
            .query_row(
                &format!("{TASK_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                |row| Ok(parse_task_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn exists_by_id(&self, id: TaskId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn save(&self, task: &Task) -> RepoResult<Task> {
        self.conn
            .execute(
                "INSERT INTO tasks (
                    id,
                    title,
                    description,
                    status,
                    due_date,
                    parent_case,
                    position
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6,
                    (SELECT COALESCE(MAX(position) + 1, 0) FROM tasks WHERE parent_case = ?6)
                )
                ON CONFLICT (id) DO UPDATE SET
                    title = excluded.title,
                    description = excluded.description,
                    status = excluded.status,
                    due_date = excluded.due_date,
                    position = CASE
                        WHEN tasks.parent_case = excluded.parent_case THEN tasks.position
                        ELSE excluded.position
                    END,
                    parent_case = excluded.parent_case;",
                params![
                    task.id.to_string(),
                    task.title.as_str(),
                    task.description.as_str(),
                    task.status.as_str(),
                    task.due_date.as_ref().map(format_timestamp),
                    task.parent_case.to_string(),
                ],
            )
            .map_err(map_write_error)?;

        self.find_by_id(task.id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("task `{}` missing after save", task.id))
        })
    }

    fn delete_by_id(&self, id: TaskId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn find_all_by_parent_case(
        &self,
        parent_case: CaseId,
        page: &PageRequest<TaskSortField>,
    ) -> RepoResult<Page<Task>> {
        self.load_page(
            "WHERE parent_case = ?",
            vec![Value::Text(parent_case.to_string())],
            page,
        )
    }

    fn find_ids_by_parent_case(&self, parent_case: CaseId) -> RepoResult<Vec<TaskId>> {
        load_task_ids(self.conn, parent_case)
    }

    fn search(
        &self,
        filter: &SearchFilter,
        page: &PageRequest<TaskSortField>,
    ) -> RepoResult<Page<Task>> {
        let id_value = match filter.id() {
            Some(id) => Value::Text(id.to_string()),
            None => Value::Null,
        };
        self.load_page(
            "WHERE id = ? OR instr(casefold(title), ?) > 0",
            vec![id_value, Value::Text(filter.needle().to_string())],
            page,
        )
    }
}

/// Loads child task ids of `parent_case` in attachment order.
pub(crate) fn load_task_ids(conn: &Connection, parent_case: CaseId) -> RepoResult<Vec<TaskId>> {
    let mut stmt = conn.prepare(
        "SELECT id
         FROM tasks
         WHERE parent_case = ?1
         ORDER BY position ASC, id ASC;",
    )?;
    let mut rows = stmt.query([parent_case.to_string()])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        ids.push(parse_uuid(&value, "tasks.id")?);
    }
    Ok(ids)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let parent_text: String = row.get("parent_case")?;

    let due_date = match row.get::<_, Option<String>>("due_date")? {
        Some(value) => Some(parse_timestamp(&value).map_err(|_| {
            RepoError::InvalidData(format!("invalid timestamp `{value}` in tasks.due_date"))
        })?),
        None => None,
    };

    Ok(Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status: row.get("status")?,
        due_date,
        parent_case: parse_uuid(&parent_text, "tasks.parent_case")?,
    })
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn task_sort_column(field: TaskSortField) -> &'static str {
    match field {
        TaskSortField::Id => "id",
        TaskSortField::Title => "casefold(title)",
        TaskSortField::Description => "casefold(description)",
        TaskSortField::Status => "casefold(status)",
        TaskSortField::DueDate => "due_date",
    }
}
