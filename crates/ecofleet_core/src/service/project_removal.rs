//! Confirm-then-delete flow.
//!
//! # Invariants
//! - Nothing is deleted unless the operator types `yes` after seeing the
//!   record.

use crate::console::{ask, Console, PromptError, Tone};
use crate::model::project::ProjectId;
use crate::repo::project_repo::{ProjectRepository, RepoError};
use crate::service::presentation::detail_lines;
use crate::validation::require_positive_id;
use log::{error, info, warn};

const CONFIRMATION_WORD: &str = "yes";

/// Result of the delete flow.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(ProjectId),
    NotFound(ProjectId),
    Cancelled,
    StoreFailed(String),
    Aborted,
}

pub struct ProjectRemoval<P: ProjectRepository> {
    projects: P,
}

impl<P: ProjectRepository> ProjectRemoval<P> {
    pub fn new(projects: P) -> Self {
        Self { projects }
    }

    pub fn delete_project<C: Console + ?Sized>(&self, console: &mut C) -> DeleteOutcome {
        console.clear();
        console.show(Tone::Heading, "=== Deleting a project ===");
        let outcome = match self.run(console) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("event=project_delete module=removal status=aborted error={err}");
                console.show(Tone::Failure, "Operation aborted. Nothing was deleted.");
                DeleteOutcome::Aborted
            }
        };
        console.pause();
        outcome
    }

    fn run<C: Console + ?Sized>(&self, console: &mut C) -> Result<DeleteOutcome, PromptError> {
        let raw = ask(console, "ID of the project to delete: ")?;
        let id = require_positive_id(console, raw, "Project ID")?;

        let listing = match self.projects.get_project(id) {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                console.show(Tone::Failure, "No project found with the given ID.");
                return Ok(DeleteOutcome::NotFound(id));
            }
            Err(err) => return Ok(self.report_failure(console, id, &err)),
        };

        console.show(Tone::Heading, "=== Project information ===");
        for line in detail_lines(&listing) {
            console.show(Tone::Plain, &line);
        }

        let answer = ask(
            console,
            "Are you sure you want to delete this project? (yes/no): ",
        )?;
        if !answer.trim().eq_ignore_ascii_case(CONFIRMATION_WORD) {
            info!("event=project_delete module=removal status=cancelled project_id={id}");
            console.show(Tone::Notice, "Deletion cancelled by the operator.");
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.projects.delete_project(id) {
            Ok(()) => {
                console.show(Tone::Success, "Project deleted successfully!");
                Ok(DeleteOutcome::Deleted(id))
            }
            Err(RepoError::NotFound(missing)) => {
                console.show(Tone::Failure, "No project found with the given ID.");
                Ok(DeleteOutcome::NotFound(missing))
            }
            Err(err) => Ok(self.report_failure(console, id, &err)),
        }
    }

    fn report_failure<C: Console + ?Sized>(
        &self,
        console: &mut C,
        id: ProjectId,
        err: &RepoError,
    ) -> DeleteOutcome {
        error!("event=project_delete module=removal status=error project_id={id} error={err}");
        console.show(Tone::Failure, &format!("Error deleting project: {err}"));
        DeleteOutcome::StoreFailed(err.to_string())
    }
}
