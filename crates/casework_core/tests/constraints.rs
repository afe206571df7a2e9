use casework_core::db::{open_db, open_db_in_memory};
use casework_core::{CaseDto, CaseworkService, Constraint, ErrorKind, RepoError, ServiceError};
use std::sync::{Arc, Barrier};
use std::thread;

fn payload(case_number: &str, title: &str) -> CaseDto {
    CaseDto {
        case_number: case_number.to_string(),
        title: title.to_string(),
        ..CaseDto::default()
    }
}

#[test]
fn second_case_with_same_number_is_rejected_and_first_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();
    let first = service.save_case(&payload("C1", "original")).unwrap();

    let err = service.save_case(&payload("C1", "impostor")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    match err {
        ServiceError::DuplicateCaseNumber(RepoError::ConstraintViolation { constraint, .. }) => {
            assert_eq!(constraint, Constraint::UniqueCaseNumber)
        }
        other => panic!("unexpected error: {other}"),
    }

    let stored = service.get_case_by_number("C1").unwrap().unwrap();
    assert_eq!(stored, first);
}

#[test]
fn empty_case_numbers_collide() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();

    service.save_case(&payload("", "first")).unwrap();
    let err = service.save_case(&payload("", "second")).unwrap_err();
    assert!(err.is_duplicate_case_number());
}

#[test]
fn renaming_onto_taken_number_is_a_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();
    let first = service.save_case(&payload("C1", "first")).unwrap();
    let second = service.save_case(&payload("C2", "second")).unwrap();

    let err = service
        .update_case_property(second.id.unwrap(), "caseNumber", "C1")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);

    assert_eq!(service.get_case(first.id.unwrap()).unwrap().unwrap(), first);
    assert_eq!(service.get_case(second.id.unwrap()).unwrap().unwrap(), second);
}

#[test]
fn store_rejects_task_rows_without_parent() {
    let conn = open_db_in_memory().unwrap();
    let err = conn
        .execute(
            "INSERT INTO tasks (id, parent_case) VALUES ('t', 'missing');",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
}

#[test]
fn concurrent_creates_with_same_number_commit_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("casework.db");
    drop(open_db(&path).unwrap());

    let writers = 4;
    let barrier = Arc::new(Barrier::new(writers));
    let handles: Vec<_> = (0..writers)
        .map(|n| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let service = CaseworkService::open(&conn).unwrap();
                barrier.wait();
                service
                    .save_case(&payload("RACE-1", &format!("writer {n}")))
                    .map(|_| ())
                    .map_err(|err| err.is_duplicate_case_number())
            })
        })
        .collect();

    let results: Vec<Result<(), bool>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(results.iter().all(|result| match result {
        Ok(()) => true,
        Err(duplicate) => *duplicate,
    }));

    let conn = open_db(&path).unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM cases WHERE case_number = 'RACE-1';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}
