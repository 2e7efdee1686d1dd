//! Query and export flows over stored projects.
//!
//! # Responsibility
//! - Filter projects by status through a closed three-option menu.
//! - Feed the filtered list to the exporter in the operator's chosen format.
//!
//! # Invariants
//! - Read-only: these flows never write to the store.
//! - Export failures are reported and end the flow; no partial file is left
//!   under the destination name.

use crate::console::{ask, Console, PromptError, Tone};
use crate::export::{export_records, resolve_destination, ExportFormat, ExportRecord};
use crate::model::project::{ProjectListing, ProjectStatus};
use crate::repo::project_repo::{ProjectListQuery, ProjectRepository};
use crate::service::presentation::summary_line;
use crate::validation::{parse_menu_choice, require_menu_choice};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

const FILTER_MENU: [(Option<ProjectStatus>, &str); 3] = [
    (None, "All projects"),
    (Some(ProjectStatus::InProgress), "Only projects in progress"),
    (Some(ProjectStatus::Completed), "Only completed projects"),
];

/// Result of the export flow.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Exported(PathBuf),
    NothingToExport,
    Failed(String),
    Aborted,
}

pub struct ProjectQueries<P: ProjectRepository> {
    projects: P,
}

impl<P: ProjectRepository> ProjectQueries<P> {
    pub fn new(projects: P) -> Self {
        Self { projects }
    }

    /// Interactive status-filtered listing. Returns the rows shown; an
    /// invalid filter choice or a store failure yields an empty list.
    pub fn query_projects<C: Console + ?Sized>(&self, console: &mut C) -> Vec<ProjectListing> {
        console.clear();
        console.show(Tone::Heading, "=== Querying projects ===");
        let listings = match self.select_and_list(console) {
            Ok(listings) => listings,
            Err(err) => {
                warn!("event=project_query module=queries status=aborted error={err}");
                Vec::new()
            }
        };
        console.pause();
        listings
    }

    /// Interactive export: filter, pick a format, optionally name the file,
    /// then write it into `export_dir`.
    pub fn export_projects<C: Console + ?Sized>(
        &self,
        console: &mut C,
        export_dir: &Path,
    ) -> ExportOutcome {
        console.show(Tone::Heading, "=== Select the projects to export ===");
        let outcome = match self.run_export(console, export_dir) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("event=export module=queries status=aborted error={err}");
                console.show(Tone::Failure, "Operation aborted. Nothing was exported.");
                ExportOutcome::Aborted
            }
        };
        console.pause();
        outcome
    }

    fn run_export<C: Console + ?Sized>(
        &self,
        console: &mut C,
        export_dir: &Path,
    ) -> Result<ExportOutcome, PromptError> {
        let listings = self.select_and_list(console)?;
        if listings.is_empty() {
            console.show(Tone::Failure, "No data available for export.");
            return Ok(ExportOutcome::NothingToExport);
        }

        console.show(Tone::Heading, "=== Export data ===");
        for (position, format) in ExportFormat::ALL.iter().enumerate() {
            console.show(
                Tone::Plain,
                &format!("{}. Export to {}", position + 1, format.label()),
            );
        }
        let format = ExportFormat::ALL[require_menu_choice(console, ExportFormat::ALL.len())?];

        let destination = ask_destination(console, export_dir, format)?;
        let records: Vec<ExportRecord> = listings
            .iter()
            .map(|listing| ExportRecord::from(&listing.project))
            .collect();

        match export_records(&records, format, &destination) {
            Ok(()) => {
                console.show(
                    Tone::Success,
                    &format!("Data exported to file: {}", destination.display()),
                );
                Ok(ExportOutcome::Exported(destination))
            }
            Err(err) => {
                console.show(
                    Tone::Failure,
                    &format!("Error exporting to {}: {err}", format.label()),
                );
                Ok(ExportOutcome::Failed(err.to_string()))
            }
        }
    }

    fn select_and_list<C: Console + ?Sized>(
        &self,
        console: &mut C,
    ) -> Result<Vec<ProjectListing>, PromptError> {
        for (position, (_, label)) in FILTER_MENU.iter().enumerate() {
            console.show(Tone::Plain, &format!("{}. {label}", position + 1));
        }

        let raw = ask(console, &format!("Choose an option (1-{}): ", FILTER_MENU.len()))?;
        let Ok(index) = parse_menu_choice(&raw, FILTER_MENU.len()) else {
            console.show(Tone::Failure, "Invalid option.");
            return Ok(Vec::new());
        };
        let query = ProjectListQuery {
            status: FILTER_MENU[index].0,
        };

        let listings = match self.projects.list_projects(&query) {
            Ok(listings) => listings,
            Err(err) => {
                error!("event=project_query module=queries status=error error={err}");
                console.show(Tone::Failure, &format!("Error querying projects: {err}"));
                return Ok(Vec::new());
            }
        };

        info!(
            "event=project_query module=queries status=ok filter={} rows={}",
            query.status.map_or("all", ProjectStatus::as_str),
            listings.len()
        );

        if listings.is_empty() {
            console.show(Tone::Failure, "No projects found.");
        }
        for listing in &listings {
            console.show(Tone::Plain, &summary_line(listing));
        }

        Ok(listings)
    }
}

/// Asks for a file name until it resolves inside `export_dir`.
fn ask_destination<C: Console + ?Sized>(
    console: &mut C,
    export_dir: &Path,
    format: ExportFormat,
) -> Result<PathBuf, PromptError> {
    loop {
        let name = ask(console, "File name (leave blank for the dated default): ")?;
        match resolve_destination(export_dir, Some(name.as_str()), format) {
            Ok(destination) => return Ok(destination),
            Err(err) => {
                warn!("event=export module=queries status=rejected error_code=invalid_file_name");
                console.show(Tone::Failure, &err.to_string());
            }
        }
    }
}
