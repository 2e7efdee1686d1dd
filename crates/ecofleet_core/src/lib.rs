//! Core domain logic for EcoFleet, a console manager for sustainable-energy
//! projects. This crate is the single source of truth for record invariants.

pub mod console;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use console::{Console, PromptError, ScriptedConsole, Tone};
pub use export::{export_records, ExportError, ExportFormat, ExportRecord};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::lookup::{LookupError, LookupRow, LookupTable};
pub use model::project::{
    LookupId, NewProject, Project, ProjectId, ProjectListing, ProjectStatus,
    ProjectValidationError,
};
pub use repo::lookup_repo::{LookupRepository, SqliteLookupRepository};
pub use repo::project_repo::{
    ProjectListQuery, ProjectRepository, RepoError, RepoResult, SqliteProjectRepository,
};
pub use service::project_editor::{
    CreateOutcome, EditSession, EditState, ProjectEditor, UpdateOutcome,
};
pub use service::project_queries::{ExportOutcome, ProjectQueries};
pub use service::project_removal::{DeleteOutcome, ProjectRemoval};
pub use service::reference_resolver::ReferenceResolver;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
