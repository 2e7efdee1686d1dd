mod support;

use ecofleet_core::db::open_db_in_memory;
use ecofleet_core::{
    LookupRepository, LookupTable, ProjectListQuery, ProjectRepository, ProjectStatus,
    ProjectValidationError, RepoError, SqliteLookupRepository, SqliteProjectRepository,
};
use support::solar_farm;

#[test]
fn insert_then_fetch_returns_identical_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);

    let id = repo.create_project(&solar_farm()).unwrap();
    let loaded = repo.get_project(id).unwrap().unwrap();

    assert_eq!(loaded.project.id, id);
    assert_eq!(loaded.project.description, "Solar Farm");
    assert_eq!(loaded.project.cost, 1000.0);
    assert_eq!(loaded.project.status, ProjectStatus::Completed);
    assert_eq!(loaded.project.source_type_id, 1);
    assert_eq!(loaded.project.region_id, 2);
    assert_eq!(loaded.source_type_label, "Solar");
    assert_eq!(loaded.region_label, "Northeast");
}

#[test]
fn get_missing_project_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);

    assert!(repo.get_project(42).unwrap().is_none());
}

#[test]
fn update_overwrites_every_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);
    let id = repo.create_project(&solar_farm()).unwrap();

    let mut project = repo.get_project(id).unwrap().unwrap().project;
    project.description = "Offshore Wind".to_string();
    project.cost = 250.5;
    project.status = ProjectStatus::InProgress;
    project.source_type_id = 2;
    project.region_id = 5;
    repo.update_project(&project).unwrap();

    let loaded = repo.get_project(id).unwrap().unwrap();
    assert_eq!(loaded.project, project);
    assert_eq!(loaded.source_type_label, "Wind");
    assert_eq!(loaded.region_label, "South");
}

#[test]
fn update_and_delete_of_missing_id_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);
    let id = repo.create_project(&solar_farm()).unwrap();
    let mut project = repo.get_project(id).unwrap().unwrap().project;
    project.id = id + 100;

    let err = repo.update_project(&project).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id + 100));

    let err = repo.delete_project(id + 100).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn delete_removes_the_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);
    let id = repo.create_project(&solar_farm()).unwrap();

    repo.delete_project(id).unwrap();
    assert!(repo.get_project(id).unwrap().is_none());
}

#[test]
fn invalid_projects_are_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);

    let mut blank = solar_farm();
    blank.description = "  ".to_string();
    let err = repo.create_project(&blank).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ProjectValidationError::EmptyDescription)
    ));

    let mut negative = solar_farm();
    negative.cost = -5.0;
    let err = repo.create_project(&negative).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ProjectValidationError::NonPositiveCost(_))
    ));

    assert!(repo
        .list_projects(&ProjectListQuery::default())
        .unwrap()
        .is_empty());
}

#[test]
fn dangling_reference_is_rejected_by_store() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);

    let mut dangling = solar_farm();
    dangling.region_id = 77;
    let err = repo.create_project(&dangling).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn list_filters_by_status_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);

    let completed = repo.create_project(&solar_farm()).unwrap();
    let mut pending = solar_farm();
    pending.description = "Hydro Dam".to_string();
    pending.status = ProjectStatus::InProgress;
    let in_progress = repo.create_project(&pending).unwrap();

    let all = repo.list_projects(&ProjectListQuery::default()).unwrap();
    let ids: Vec<_> = all.iter().map(|listing| listing.project.id).collect();
    assert_eq!(ids, vec![completed, in_progress]);

    let only_pending = repo
        .list_projects(&ProjectListQuery {
            status: Some(ProjectStatus::InProgress),
        })
        .unwrap();
    assert_eq!(only_pending.len(), 1);
    assert_eq!(only_pending[0].project.id, in_progress);
}

#[test]
fn corrupted_status_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&conn);
    let id = repo.create_project(&solar_farm()).unwrap();

    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "UPDATE projects SET status = 'Concluded' WHERE id = ?1;",
        [id],
    )
    .unwrap();

    let err = repo.get_project(id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn lookup_rows_come_back_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let lookups = SqliteLookupRepository::new(&conn);

    let regions = lookups.list_rows(LookupTable::Regions).unwrap();
    let ids: Vec<_> = regions.iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(regions[1].label, "Northeast");

    let sources = lookups.list_rows(LookupTable::SourceTypes).unwrap();
    assert_eq!(sources[0].label, "Solar");
}
