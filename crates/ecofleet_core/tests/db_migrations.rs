use ecofleet_core::db::{
    ensure_reference_data, latest_version, open_db, open_db_in_memory, DbError,
};
use ecofleet_core::LookupTable;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "source_types");
    assert_table_exists(&conn, "regions");
    assert_table_exists(&conn, "projects");
}

#[test]
fn reference_data_is_seeded() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(row_count(&conn, "source_types"), 5);
    assert_eq!(row_count(&conn, "regions"), 5);
    assert_eq!(row_count(&conn, "projects"), 0);
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();

    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let result = conn.execute(
        "INSERT INTO projects (description, cost, status, source_type_id, region_id)
         VALUES ('Dangling', 10.0, 'completed', 99, 1);",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ecofleet.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(row_count(&conn_second, "regions"), 5);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn seeded_store_passes_reference_data_check() {
    let conn = open_db_in_memory().unwrap();
    ensure_reference_data(&conn).unwrap();
}

#[test]
fn emptied_lookup_table_fails_reference_data_check() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("DELETE FROM regions", []).unwrap();

    let err = ensure_reference_data(&conn).unwrap_err();
    assert!(matches!(
        err,
        DbError::MissingReferenceData(LookupTable::Regions)
    ));
    assert_eq!(err.to_string(), "reference table regions has no rows");
}

#[test]
fn seed_step_rolls_back_when_a_lookup_table_stays_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.sqlite3");

    // Schema at step 1 with a trigger that swallows every region insert.
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE source_types (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);
         CREATE TABLE regions (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);
         CREATE TRIGGER drop_regions AFTER INSERT ON regions
         BEGIN DELETE FROM regions WHERE id = NEW.id; END;
         PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::MissingReferenceData(LookupTable::Regions)
    ));

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 1);
    assert_eq!(row_count(&conn, "source_types"), 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
