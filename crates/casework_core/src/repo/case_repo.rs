//! Case repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide find/exists/save/delete/search over the `cases` table.
//! - Load each case's derived task-id list at read time.
//!
//! # Invariants
//! - `save` is an upsert keyed by `id`; a duplicate `case_number` fails with
//!   `ConstraintViolation(UniqueCaseNumber)` and writes nothing.
//! - `delete_by_id` removes the case and all of its tasks in one transaction.
//! - Paged reads order by the requested field, then `id ASC`. Text fields
//!   compare through `casefold`, as does the search needle.

use crate::model::case::{Case, CaseId, CaseSortField};
use crate::model::page::{Page, PageRequest};
use crate::model::timestamp::{format_timestamp, parse_timestamp};
use crate::repo::error::{map_write_error, RepoError, RepoResult};
use crate::repo::schema::ensure_connection_ready;
use crate::repo::task_repo::load_task_ids;
use crate::search::filter::SearchFilter;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const CASE_SELECT_SQL: &str = "SELECT
    id,
    case_number,
    title,
    description,
    status,
    created_date
FROM cases";

const CASE_SEARCH_WHERE: &str = "WHERE id = ?1
    OR instr(casefold(title), ?2) > 0
    OR instr(casefold(case_number), ?2) > 0";

const CASE_COLUMNS: &[&str] = &[
    "id",
    "case_number",
    "title",
    "description",
    "status",
    "created_date",
];

/// Repository interface for case persistence.
pub trait CaseRepository {
    fn find_by_id(&self, id: CaseId) -> RepoResult<Option<Case>>;
    fn exists_by_id(&self, id: CaseId) -> RepoResult<bool>;
    /// First case with exactly this number (at most one exists).
    fn find_by_case_number(&self, case_number: &str) -> RepoResult<Option<Case>>;
    /// Inserts or updates by id and returns the stored row.
    fn save(&self, case: &Case) -> RepoResult<Case>;
    /// Deletes the case and its tasks. Returns whether a case row existed.
    fn delete_by_id(&self, id: CaseId) -> RepoResult<bool>;
    fn search(
        &self,
        filter: &SearchFilter,
        page: &PageRequest<CaseSortField>,
    ) -> RepoResult<Page<Case>>;
}

/// SQLite-backed case repository.
pub struct SqliteCaseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCaseRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "cases", CASE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl CaseRepository for SqliteCaseRepository<'_> {
    fn find_by_id(&self, id: CaseId) -> RepoResult<Option<Case>> {
        load_case_where(self.conn, "id = ?1", &id.to_string())
    }

    fn exists_by_id(&self, id: CaseId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM cases WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn find_by_case_number(&self, case_number: &str) -> RepoResult<Option<Case>> {
        load_case_where(self.conn, "case_number = ?1", case_number)
    }

    fn save(&self, case: &Case) -> RepoResult<Case> {
        self.conn
            .execute(
                "INSERT INTO cases (
                    id,
                    case_number,
                    title,
                    description,
                    status,
                    created_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT (id) DO UPDATE SET
                    case_number = excluded.case_number,
                    title = excluded.title,
                    description = excluded.description,
                    status = excluded.status,
                    created_date = excluded.created_date;",
                params![
                    case.id.to_string(),
                    case.case_number.as_str(),
                    case.title.as_str(),
                    case.description.as_str(),
                    case.status.as_str(),
                    format_timestamp(&case.created_date),
                ],
            )
            .map_err(map_write_error)?;

        self.find_by_id(case.id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("case `{}` missing after save", case.id))
        })
    }

    fn delete_by_id(&self, id: CaseId) -> RepoResult<bool> {
        let id_text = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM tasks WHERE parent_case = ?1;", [id_text.as_str()])?;
        let changed = tx.execute("DELETE FROM cases WHERE id = ?1;", [id_text.as_str()])?;
        tx.commit()?;
        Ok(changed > 0)
    }

    fn search(
        &self,
        filter: &SearchFilter,
        page: &PageRequest<CaseSortField>,
    ) -> RepoResult<Page<Case>> {
        let id_param = filter.id().map(|id| id.to_string());
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;

        let total: i64 = tx.query_row(
            &format!("SELECT COUNT(*) FROM cases {CASE_SEARCH_WHERE};"),
            params![id_param, filter.needle()],
            |row| row.get(0),
        )?;

        let sql = format!(
            "{CASE_SELECT_SQL}
             {CASE_SEARCH_WHERE}
             ORDER BY {} {}, id ASC
             LIMIT ?3 OFFSET ?4;",
            case_sort_column(page.sort.field),
            page.sort.direction.as_sql()
        );
        let mut cases = Vec::new();
        {
            let mut stmt = tx.prepare(&sql)?;
            let mut rows = stmt.query(params![
                id_param,
                filter.needle(),
                page.page_size,
                page.offset()
            ])?;
            while let Some(row) = rows.next()? {
                cases.push(parse_case_row(row)?);
            }
        }
        for case in &mut cases {
            case.tasks = load_task_ids(&tx, case.id)?;
        }
        tx.commit()?;

        Ok(Page::new(cases, page, total.max(0) as u64))
    }
}

fn load_case_where(conn: &Connection, predicate: &str, value: &str) -> RepoResult<Option<Case>> {
    let case = conn
        .query_row(
            &format!("{CASE_SELECT_SQL} WHERE {predicate} LIMIT 1;"),
            [value],
            |row| Ok(parse_case_row(row)),
        )
        .optional()?
        .transpose()?;

    match case {
        Some(mut case) => {
            case.tasks = load_task_ids(conn, case.id)?;
            Ok(Some(case))
        }
        None => Ok(None),
    }
}

fn parse_case_row(row: &Row<'_>) -> RepoResult<Case> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{id_text}` in cases.id")))?;

    let created_text: String = row.get("created_date")?;
    let created_date = parse_timestamp(&created_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{created_text}` in cases.created_date"
        ))
    })?;

    Ok(Case {
        id,
        case_number: row.get("case_number")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status: row.get("status")?,
        created_date,
        tasks: Vec::new(),
    })
}

fn case_sort_column(field: CaseSortField) -> &'static str {
    match field {
        CaseSortField::Id => "id",
        CaseSortField::CaseNumber => "casefold(case_number)",
        CaseSortField::Title => "casefold(title)",
        CaseSortField::Description => "casefold(description)",
        CaseSortField::Status => "casefold(status)",
        CaseSortField::CreatedDate => "created_date",
    }
}
