mod support;

use ecofleet_core::{
    export_records, ExportError, ExportFormat, ExportRecord, Project, ProjectStatus,
};
use calamine::Data;
use serde_json::Value;

fn records() -> Vec<ExportRecord> {
    let first = Project::from_new(1, support::solar_farm());
    let second = Project {
        id: 2,
        description: "Usina Eólica".to_string(),
        cost: 250.5,
        status: ProjectStatus::InProgress,
        source_type_id: 2,
        region_id: 5,
    };
    vec![ExportRecord::from(&first), ExportRecord::from(&second)]
}

#[test]
fn json_export_is_an_indented_array_with_stable_key_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.json");

    export_records(&records(), ExportFormat::Json, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("[\n    {\n        \"id\": 1,"));
    assert!(text.contains("Usina Eólica"));

    let keys: Vec<usize> = [
        "\"id\"",
        "\"description\"",
        "\"cost\"",
        "\"status\"",
        "\"source_type_id\"",
        "\"region_id\"",
    ]
    .iter()
    .map(|key| text.find(key).unwrap())
    .collect();
    assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));

    let parsed: Value = serde_json::from_str(&text).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["status"], "completed");
    assert_eq!(rows[1]["cost"], 250.5);
    assert_eq!(rows[1]["region_id"], 5);
}

#[test]
fn workbook_export_has_header_row_and_one_row_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.xlsx");

    export_records(&records(), ExportFormat::Spreadsheet, &path).unwrap();

    let rows = support::workbook_rows(&path);
    assert_eq!(rows.len(), 3);
    let headers: Vec<Data> = [
        "id",
        "description",
        "cost",
        "status",
        "source_type_id",
        "region_id",
    ]
    .into_iter()
    .map(support::text)
    .collect();
    assert_eq!(rows[0], headers);
    assert_eq!(
        rows[1],
        vec![
            Data::Float(1.0),
            support::text("Solar Farm"),
            Data::Float(1000.0),
            support::text("completed"),
            Data::Float(1.0),
            Data::Float(2.0),
        ]
    );
    assert_eq!(rows[2][1], support::text("Usina Eólica"));
    assert_eq!(rows[2][2], Data::Float(250.5));
    assert_eq!(rows[2][3], support::text("in_progress"));
    assert_eq!(rows[2][5], Data::Float(5.0));
}

#[test]
fn empty_workbook_export_still_has_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");

    export_records(&[], ExportFormat::Spreadsheet, &path).unwrap();

    let rows = support::workbook_rows(&path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], support::text("id"));
    assert_eq!(rows[0][5], support::text("region_id"));
}

#[test]
fn missing_directory_fails_without_creating_anything() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("projects.json");

    let err = export_records(&records(), ExportFormat::Json, &path).unwrap_err();

    assert!(matches!(err, ExportError::Io(_)));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn export_replaces_existing_file_completely() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.json");
    std::fs::write(&path, "stale content that is much longer than nothing").unwrap();

    export_records(&records()[..1], ExportFormat::Json, &path).unwrap();

    let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}
