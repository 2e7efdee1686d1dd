//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `projects` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Update/delete of an absent id is `RepoError::NotFound`, never a no-op.

use crate::db::DbError;
use crate::model::project::{
    NewProject, Project, ProjectId, ProjectListing, ProjectStatus, ProjectValidationError,
};
use log::{error, info};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PROJECT_LISTING_SQL: &str = "SELECT
    p.id,
    p.description,
    p.cost,
    p.status,
    p.source_type_id,
    st.name AS source_type_label,
    p.region_id,
    r.name AS region_label
FROM projects p
INNER JOIN source_types st ON st.id = p.source_type_id
INNER JOIN regions r ON r.id = p.region_id";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for project and lookup persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProjectValidationError),
    Db(DbError),
    NotFound(ProjectId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ProjectValidationError> for RepoError {
    fn from(value: ProjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter options for listing projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectListQuery {
    /// `None` lists every project.
    pub status: Option<ProjectStatus>,
}

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    fn create_project(&self, project: &NewProject) -> RepoResult<ProjectId>;
    /// Overwrites every mutable field of the stored row with `project`.
    fn update_project(&self, project: &Project) -> RepoResult<()>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<ProjectListing>>;
    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<ProjectListing>>;
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
}

impl<R: ProjectRepository + ?Sized> ProjectRepository for &R {
    fn create_project(&self, project: &NewProject) -> RepoResult<ProjectId> {
        (**self).create_project(project)
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        (**self).update_project(project)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<ProjectListing>> {
        (**self).get_project(id)
    }

    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<ProjectListing>> {
        (**self).list_projects(query)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        (**self).delete_project(id)
    }
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &NewProject) -> RepoResult<ProjectId> {
        project.validate()?;

        let result = self.conn.execute(
            "INSERT INTO projects (
                description,
                cost,
                status,
                source_type_id,
                region_id
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                project.description.trim(),
                project.cost,
                project.status.as_str(),
                project.source_type_id,
                project.region_id,
            ],
        );

        match result {
            Ok(_) => {
                let id = self.conn.last_insert_rowid();
                info!("event=project_insert module=repo status=ok project_id={id}");
                Ok(id)
            }
            Err(err) => {
                error!(
                    "event=project_insert module=repo status=error error_code=insert_failed error={err}"
                );
                Err(err.into())
            }
        }
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;

        let changed = self.conn.execute(
            "UPDATE projects
             SET
                description = ?1,
                cost = ?2,
                status = ?3,
                source_type_id = ?4,
                region_id = ?5
             WHERE id = ?6;",
            params![
                project.description.trim(),
                project.cost,
                project.status.as_str(),
                project.source_type_id,
                project.region_id,
                project.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(project.id));
        }

        info!(
            "event=project_update module=repo status=ok project_id={}",
            project.id
        );
        Ok(())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<ProjectListing>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_LISTING_SQL} WHERE p.id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_listing_row(row)?));
        }

        Ok(None)
    }

    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<ProjectListing>> {
        let mut sql = format!("{PROJECT_LISTING_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND p.status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }

        sql.push_str(" ORDER BY p.id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut listings = Vec::new();

        while let Some(row) = rows.next()? {
            listings.push(parse_listing_row(row)?);
        }

        Ok(listings)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=project_delete module=repo status=ok project_id={id}");
        Ok(())
    }
}

fn parse_listing_row(row: &Row<'_>) -> RepoResult<ProjectListing> {
    let status_text: String = row.get("status")?;
    let status = ProjectStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid project status `{status_text}` in projects.status"
        ))
    })?;

    let project = Project {
        id: row.get("id")?,
        description: row.get("description")?,
        cost: row.get("cost")?,
        status,
        source_type_id: row.get("source_type_id")?,
        region_id: row.get("region_id")?,
    };
    project
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("project {}: {err}", project.id)))?;

    Ok(ProjectListing {
        project,
        source_type_label: row.get("source_type_label")?,
        region_label: row.get("region_label")?,
    })
}
