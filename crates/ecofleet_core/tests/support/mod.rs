#![allow(dead_code)]

use calamine::{open_workbook, Data, Reader, Xlsx};
use ecofleet_core::db::DbError;
use ecofleet_core::{
    LookupRepository, LookupRow, LookupTable, NewProject, Project, ProjectId, ProjectListQuery,
    ProjectListing, ProjectRepository, ProjectStatus, RepoError, RepoResult,
};
use std::cell::{Cell, RefCell};
use std::path::Path;

/// In-memory project store that records every write it receives.
#[derive(Default)]
pub struct RecordingProjects {
    pub rows: RefCell<Vec<ProjectListing>>,
    pub inserts: RefCell<Vec<NewProject>>,
    pub updates: RefCell<Vec<Project>>,
    pub deletes: RefCell<Vec<ProjectId>>,
    pub fail_writes: Cell<bool>,
}

impl RecordingProjects {
    pub fn with_rows(rows: Vec<ProjectListing>) -> Self {
        Self {
            rows: RefCell::new(rows),
            ..Self::default()
        }
    }

    pub fn write_count(&self) -> usize {
        self.inserts.borrow().len() + self.updates.borrow().len() + self.deletes.borrow().len()
    }
}

fn write_failure() -> RepoError {
    RepoError::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
        Some("database is locked".to_string()),
    )))
}

impl ProjectRepository for RecordingProjects {
    fn create_project(&self, project: &NewProject) -> RepoResult<ProjectId> {
        if self.fail_writes.get() {
            return Err(write_failure());
        }
        project.validate()?;
        self.inserts.borrow_mut().push(project.clone());
        Ok(self.inserts.borrow().len() as ProjectId)
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(write_failure());
        }
        project.validate()?;
        self.updates.borrow_mut().push(project.clone());
        Ok(())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<ProjectListing>> {
        Ok(self
            .rows
            .borrow()
            .iter()
            .find(|listing| listing.project.id == id)
            .cloned())
    }

    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<ProjectListing>> {
        Ok(self
            .rows
            .borrow()
            .iter()
            .filter(|listing| query.status.map_or(true, |status| listing.project.status == status))
            .cloned()
            .collect())
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(write_failure());
        }
        let mut rows = self.rows.borrow_mut();
        let before = rows.len();
        rows.retain(|listing| listing.project.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound(id));
        }
        self.deletes.borrow_mut().push(id);
        Ok(())
    }
}

/// Fixed lookup rows, optionally failing every read.
#[derive(Default)]
pub struct StaticLookups {
    pub source_types: Vec<LookupRow>,
    pub regions: Vec<LookupRow>,
    pub unreachable: bool,
    pub reads: Cell<usize>,
}

impl StaticLookups {
    pub fn seeded() -> Self {
        Self {
            source_types: vec![LookupRow::new(1, "Solar"), LookupRow::new(2, "Wind")],
            regions: vec![LookupRow::new(1, "North"), LookupRow::new(5, "South")],
            ..Self::default()
        }
    }
}

impl LookupRepository for StaticLookups {
    fn list_rows(&self, table: LookupTable) -> RepoResult<Vec<LookupRow>> {
        self.reads.set(self.reads.get() + 1);
        if self.unreachable {
            return Err(write_failure());
        }
        Ok(match table {
            LookupTable::SourceTypes => self.source_types.clone(),
            LookupTable::Regions => self.regions.clone(),
        })
    }
}

pub fn wind_park() -> ProjectListing {
    ProjectListing {
        project: Project {
            id: 7,
            description: "Wind Park".to_string(),
            cost: 100.0,
            status: ProjectStatus::InProgress,
            source_type_id: 2,
            region_id: 1,
        },
        source_type_label: "Wind".to_string(),
        region_label: "North".to_string(),
    }
}

pub fn solar_farm() -> NewProject {
    NewProject {
        description: "Solar Farm".to_string(),
        cost: 1000.0,
        status: ProjectStatus::Completed,
        source_type_id: 1,
        region_id: 2,
    }
}

/// Every row of the `Projects` sheet of an exported workbook.
pub fn workbook_rows(path: &Path) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range("Projects").unwrap();
    range.rows().map(<[Data]>::to_vec).collect()
}

pub fn text(value: &str) -> Data {
    Data::String(value.to_string())
}
