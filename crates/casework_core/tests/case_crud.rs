use casework_core::db::migrations::latest_version;
use casework_core::db::open_db_in_memory;
use casework_core::model::timestamp::parse_timestamp;
use casework_core::{
    Case, CaseDto, CaseRepository, CaseworkService, ErrorKind, RepoError, ServiceError,
    SqliteCaseRepository, SqliteTaskRepository, TaskDto,
};
use rusqlite::Connection;
use uuid::Uuid;

fn case_payload(case_number: &str, title: &str) -> CaseDto {
    CaseDto {
        case_number: case_number.to_string(),
        title: title.to_string(),
        description: "Details".to_string(),
        status: "Open".to_string(),
        ..CaseDto::default()
    }
}

#[test]
fn repository_save_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCaseRepository::try_new(&conn).unwrap();

    let case = Case::new(
        "CN-1",
        "Title",
        "Description",
        "Open",
        parse_timestamp("2024-05-01T10:15:30").unwrap(),
    );
    let saved = repo.save(&case).unwrap();
    assert_eq!(saved, case);

    let loaded = repo.find_by_id(case.id).unwrap().unwrap();
    assert_eq!(loaded.case_number, "CN-1");
    assert!(loaded.tasks.is_empty());
    assert!(repo.exists_by_id(case.id).unwrap());
    assert!(!repo.exists_by_id(Uuid::new_v4()).unwrap());
}

#[test]
fn repository_save_updates_existing_row_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCaseRepository::try_new(&conn).unwrap();

    let mut case = Case::new("CN-1", "Before", "", "", parse_timestamp("2024-01-01T00:00:00").unwrap());
    repo.save(&case).unwrap();
    case.title = "After".to_string();
    repo.save(&case).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM cases;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(repo.find_by_id(case.id).unwrap().unwrap().title, "After");
}

#[test]
fn find_by_case_number_matches_exactly() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCaseRepository::try_new(&conn).unwrap();
    let case = Case::new("CN-1", "", "", "", parse_timestamp("2024-01-01T00:00:00").unwrap());
    repo.save(&case).unwrap();

    assert_eq!(repo.find_by_case_number("CN-1").unwrap().unwrap().id, case.id);
    assert!(repo.find_by_case_number("cn-1").unwrap().is_none());
    assert!(repo.find_by_case_number("CN").unwrap().is_none());
}

#[test]
fn service_create_assigns_server_id_and_empty_task_list() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();

    let client_id = Uuid::new_v4();
    let mut payload = case_payload("ABC12345", "Possession claim");
    payload.id = Some(client_id);

    let created = service.save_case(&payload).unwrap();
    let id = created.id.unwrap();
    assert_ne!(id, client_id);
    assert!(created.tasks.is_empty());
    assert!(created.created_date.is_some());

    let fetched = service.get_case(id).unwrap().unwrap();
    assert_eq!(fetched.case_number, "ABC12345");
    assert_eq!(fetched.title, "Possession claim");
    assert!(fetched.tasks.is_empty());
    assert!(service.get_case(client_id).unwrap().is_none());
}

#[test]
fn service_create_keeps_supplied_created_date() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();

    let mut payload = case_payload("CN-1", "Title");
    payload.created_date = Some(parse_timestamp("2023-07-08T09:10:11.987").unwrap());
    let created = service.save_case(&payload).unwrap();

    let json = serde_json::to_value(&created).unwrap();
    assert_eq!(json["createdDate"], "2023-07-08T09:10:11");
}

#[test]
fn service_rejects_case_payload_with_tasks() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();

    let mut payload = case_payload("CN-1", "Title");
    payload.tasks = vec![Uuid::new_v4()];

    let err = service.save_case(&payload).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(service.get_case_by_number("CN-1").unwrap().is_none());
}

#[test]
fn save_cases_stops_at_first_failure_and_keeps_earlier_cases() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();

    let batch = vec![
        case_payload("CN-1", "first"),
        case_payload("CN-1", "duplicate"),
        case_payload("CN-3", "never reached"),
    ];
    let err = service.save_cases(&batch).unwrap_err();
    assert!(err.is_duplicate_case_number());

    assert_eq!(
        service.get_case_by_number("CN-1").unwrap().unwrap().title,
        "first"
    );
    assert!(service.get_case_by_number("CN-3").unwrap().is_none());
}

#[test]
fn delete_case_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();

    let id = service
        .save_case(&case_payload("CN-1", "Title"))
        .unwrap()
        .id
        .unwrap();
    service.delete_case(id).unwrap();
    service.delete_case(id).unwrap();
    service.delete_case(Uuid::new_v4()).unwrap();
    assert!(service.get_case(id).unwrap().is_none());
}

#[test]
fn task_creation_requires_existing_parent() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();

    let missing_parent = TaskDto {
        title: "Orphan".to_string(),
        parent_case: Some(Uuid::new_v4()),
        ..TaskDto::default()
    };
    let err = service.save_task(&missing_parent).unwrap_err();
    assert!(matches!(err, ServiceError::CaseNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let no_parent = TaskDto {
        title: "Orphan".to_string(),
        ..TaskDto::default()
    };
    let err = service.save_task(&no_parent).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteCaseRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteTaskRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("tasks"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE cases (
            id TEXT PRIMARY KEY NOT NULL,
            case_number TEXT NOT NULL,
            title TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteCaseRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "cases",
            column: "description"
        })
    ));
}

#[test]
fn service_open_surfaces_readiness_failure_as_fatal() {
    let conn = Connection::open_in_memory().unwrap();
    let err = CaseworkService::open(&conn).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Fatal);
}
