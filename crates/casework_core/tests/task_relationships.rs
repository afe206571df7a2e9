use casework_core::db::open_db_in_memory;
use casework_core::model::timestamp::parse_timestamp;
use casework_core::{
    CaseDto, CaseId, CaseworkService, ErrorKind, PageRequest, Sort, SqliteCaseRepository,
    SqliteTaskRepository, TaskDto, TaskRepository, TaskSortField,
};
use rusqlite::Connection;
use uuid::Uuid;

type Service<'conn> = CaseworkService<SqliteCaseRepository<'conn>, SqliteTaskRepository<'conn>>;

fn create_case(service: &Service<'_>, case_number: &str) -> CaseId {
    service
        .save_case(&CaseDto {
            case_number: case_number.to_string(),
            title: format!("Case {case_number}"),
            ..CaseDto::default()
        })
        .unwrap()
        .id
        .unwrap()
}

fn create_task(service: &Service<'_>, parent: CaseId, title: &str) -> Uuid {
    service
        .save_task(&TaskDto {
            title: title.to_string(),
            status: "To do".to_string(),
            due_date: Some(parse_timestamp("2024-06-01T09:00:00").unwrap()),
            parent_case: Some(parent),
            ..TaskDto::default()
        })
        .unwrap()
        .id
        .unwrap()
}

fn task_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn case_with_two_tasks_lists_both_in_attachment_order() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();
    let case_id = create_case(&service, "C1");

    let second_title_first = create_task(&service, case_id, "Zeta");
    let first_title_second = create_task(&service, case_id, "Alpha");

    let page = service
        .get_tasks_for_parent(case_id, &PageRequest::of(0, 10))
        .unwrap();
    assert_eq!(page.total_elements, 2);
    let titles: Vec<&str> = page.content.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Zeta"]);

    let case = service.get_case(case_id).unwrap().unwrap();
    assert_eq!(case.tasks, vec![second_title_first, first_title_second]);
}

#[test]
fn saved_task_reports_parent_under_case_key() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();
    let case_id = create_case(&service, "C1");
    let task_id = create_task(&service, case_id, "Serve claim");

    let task = service.get_task(task_id).unwrap().unwrap();
    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["case"], case_id.to_string());
    assert_eq!(json["dueDate"], "2024-06-01T09:00:00");
}

#[test]
fn tasks_for_parent_pages_and_sorts() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();
    let case_id = create_case(&service, "C1");
    for title in ["b", "d", "a", "c", "e"] {
        create_task(&service, case_id, title);
    }

    let request = PageRequest::of(1, 2).with_sort(Sort::desc(TaskSortField::Title));
    let page = service.get_tasks_for_parent(case_id, &request).unwrap();
    let titles: Vec<&str> = page.content.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["c", "b"]);
    assert_eq!(page.total_elements, 5);
    assert_eq!(page.total_pages, 3);
}

#[test]
fn tasks_for_unknown_parent_is_an_empty_page() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();

    let page = service
        .get_tasks_for_parent(Uuid::new_v4(), &PageRequest::of(0, 10))
        .unwrap();
    assert!(page.content.is_empty());
    assert_eq!(page.total_elements, 0);
}

#[test]
fn tasks_for_parent_rejects_invalid_page() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();
    let case_id = create_case(&service, "C1");

    let err = service
        .get_tasks_for_parent(case_id, &PageRequest::of(0, 0))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn deleting_case_removes_only_its_tasks() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();
    let doomed = create_case(&service, "C1");
    let kept = create_case(&service, "C2");
    let doomed_task = create_task(&service, doomed, "one");
    create_task(&service, doomed, "two");
    let kept_task = create_task(&service, kept, "three");

    service.delete_case(doomed).unwrap();

    assert_eq!(task_count(&conn), 1);
    assert!(service.get_task(doomed_task).unwrap().is_none());
    assert!(service.get_task(kept_task).unwrap().is_some());
    assert_eq!(service.get_case(kept).unwrap().unwrap().tasks, vec![kept_task]);
}

#[test]
fn deleting_task_keeps_case_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();
    let case_id = create_case(&service, "C1");
    let first = create_task(&service, case_id, "one");
    let second = create_task(&service, case_id, "two");

    service.delete_task(first).unwrap();
    service.delete_task(first).unwrap();

    let case = service.get_case(case_id).unwrap().unwrap();
    assert_eq!(case.tasks, vec![second]);
}

#[test]
fn repointing_task_moves_it_between_task_lists() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();
    let old_parent = create_case(&service, "C1");
    let new_parent = create_case(&service, "C2");
    let moved = create_task(&service, old_parent, "moved");
    let stays = create_task(&service, old_parent, "stays");
    let existing = create_task(&service, new_parent, "existing");

    let updated = service
        .update_task_property(moved, "parentCase", &new_parent.to_string())
        .unwrap();
    assert_eq!(updated.parent_case, Some(new_parent));

    assert_eq!(
        service.get_case(old_parent).unwrap().unwrap().tasks,
        vec![stays]
    );
    assert_eq!(
        service.get_case(new_parent).unwrap().unwrap().tasks,
        vec![existing, moved]
    );
}

#[test]
fn other_task_updates_keep_attachment_order() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();
    let case_id = create_case(&service, "C1");
    let first = create_task(&service, case_id, "one");
    let second = create_task(&service, case_id, "two");

    service
        .update_task_property(first, "status", "Done")
        .unwrap();

    assert_eq!(
        service.get_case(case_id).unwrap().unwrap().tasks,
        vec![first, second]
    );
}

#[test]
fn save_tasks_stops_at_first_failure() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();
    let case_id = create_case(&service, "C1");

    let batch = vec![
        TaskDto {
            title: "kept".to_string(),
            parent_case: Some(case_id),
            ..TaskDto::default()
        },
        TaskDto {
            title: "orphan".to_string(),
            ..TaskDto::default()
        },
        TaskDto {
            title: "never".to_string(),
            parent_case: Some(case_id),
            ..TaskDto::default()
        },
    ];
    let err = service.save_tasks(&batch).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(task_count(&conn), 1);
}

#[test]
fn task_search_matches_id_or_title_but_not_case_number() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();
    let case_id = create_case(&service, "BUNDLE-1");
    let bundle = create_task(&service, case_id, "Agree Bundle");
    create_task(&service, case_id, "Serve claim");

    let page = service
        .search_tasks("bundle", &PageRequest::of(0, 10))
        .unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].id, Some(bundle));

    let page = service
        .search_tasks(&bundle.to_string(), &PageRequest::of(0, 10))
        .unwrap();
    assert_eq!(page.content.len(), 1);

    let page = service
        .search_tasks("BUNDLE-1", &PageRequest::of(0, 10))
        .unwrap();
    assert!(page.content.is_empty());
}

#[test]
fn task_ids_by_parent_follow_attachment_order() {
    let conn = open_db_in_memory().unwrap();
    let service = CaseworkService::open(&conn).unwrap();
    let parent = create_case(&service, "ABC12345");
    let other = create_case(&service, "FAM20231");
    let zeta = create_task(&service, parent, "Zeta");
    create_task(&service, other, "Elsewhere");
    let alpha = create_task(&service, parent, "Alpha");

    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    assert_eq!(repo.find_ids_by_parent_case(parent).unwrap(), vec![zeta, alpha]);
    assert!(repo.find_ids_by_parent_case(Uuid::new_v4()).unwrap().is_empty());
}
