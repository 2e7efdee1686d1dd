//! Project editor: creation flow and field-by-field update state machine.
//!
//! # Responsibility
//! - Collect and validate fields for new projects and insert them in one write.
//! - Drive resumable single-field edits on an in-memory working copy and
//!   commit only when the operator finishes with actual changes.
//!
//! # Invariants
//! - Creation is all-or-nothing: a failed reference selection or an operator
//!   abort issues no insert.
//! - Update writes every working-copy field in one statement, and only when
//!   the working copy differs from the loaded original.
//! - Store and prompt failures end the flow with an outcome value; they never
//!   propagate past the editor.

use crate::console::{ask, Console, PromptError, Tone};
use crate::model::lookup::{LookupRow, LookupTable};
use crate::model::project::{NewProject, Project, ProjectId, ProjectListing, ProjectStatus};
use crate::repo::lookup_repo::LookupRepository;
use crate::repo::project_repo::ProjectRepository;
use crate::service::presentation::detail_lines;
use crate::service::reference_resolver::ReferenceResolver;
use crate::validation::{
    parse_menu_choice, parse_non_empty_text, parse_positive_number, require_non_empty_text,
    require_positive_id, require_positive_number, require_status, InputError,
};
use log::{error, info, warn};

/// Lifecycle of one update session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// Record fetched; working copy equals the original.
    Loaded,
    /// At least one field action has been taken.
    Editing,
    Saved,
    Discarded,
}

/// Original and working copies of the project being edited.
#[derive(Debug, Clone)]
pub struct EditSession {
    state: EditState,
    original: ProjectListing,
    working: ProjectListing,
}

impl EditSession {
    pub fn load(listing: ProjectListing) -> Self {
        Self {
            state: EditState::Loaded,
            original: listing.clone(),
            working: listing,
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn original(&self) -> &Project {
        &self.original.project
    }

    pub fn working(&self) -> &Project {
        &self.working.project
    }

    /// Working copy joined with the labels of its current references.
    pub fn working_listing(&self) -> &ProjectListing {
        &self.working
    }

    /// Replaces the description when `raw` has visible text.
    pub fn edit_description(&mut self, raw: &str) -> Result<(), InputError> {
        self.begin_editing();
        self.working.project.description = parse_non_empty_text(raw)?;
        Ok(())
    }

    /// Replaces the cost when `raw` is a positive number.
    pub fn edit_cost(&mut self, raw: &str) -> Result<f64, InputError> {
        self.begin_editing();
        let cost = parse_positive_number(raw)?;
        self.working.project.cost = cost;
        Ok(cost)
    }

    pub fn set_status(&mut self, status: ProjectStatus) {
        self.begin_editing();
        self.working.project.status = status;
    }

    pub fn set_source_type(&mut self, row: LookupRow) {
        self.begin_editing();
        self.working.project.source_type_id = row.id;
        self.working.source_type_label = row.label;
    }

    pub fn set_region(&mut self, row: LookupRow) {
        self.begin_editing();
        self.working.project.region_id = row.id;
        self.working.region_label = row.label;
    }

    /// Field-by-field comparison of the record; labels are not compared.
    pub fn has_changes(&self) -> bool {
        self.working.project != self.original.project
    }

    /// The full record to write on finish, or `None` when nothing changed.
    pub fn pending_write(&self) -> Option<&Project> {
        self.has_changes().then_some(&self.working.project)
    }

    pub fn mark_saved(&mut self) {
        self.state = EditState::Saved;
    }

    /// Drops the working copy back to the original.
    pub fn discard(&mut self) {
        self.working = self.original.clone();
        self.state = EditState::Discarded;
    }

    fn begin_editing(&mut self) {
        if self.state == EditState::Loaded {
            self.state = EditState::Editing;
        }
    }
}

/// Result of the creation flow.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(ProjectId),
    /// A reference table yielded no selection; nothing was written.
    SelectionFailed,
    StoreFailed(String),
    Aborted,
}

/// Result of the update flow.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    NotFound(ProjectId),
    NoChanges,
    Updated(Project),
    StoreFailed(String),
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldAction {
    Description,
    Cost,
    Status,
    SourceType,
    Region,
    Finish,
}

const FIELD_MENU: [(FieldAction, &str); 6] = [
    (FieldAction::Description, "Description"),
    (FieldAction::Cost, "Cost"),
    (FieldAction::Status, "Status"),
    (FieldAction::SourceType, "Source type"),
    (FieldAction::Region, "Region"),
    (FieldAction::Finish, "Finish and return to main menu"),
];

/// Interactive create/update flows over a project store.
pub struct ProjectEditor<P: ProjectRepository, L: LookupRepository> {
    projects: P,
    resolver: ReferenceResolver<L>,
}

impl<P: ProjectRepository, L: LookupRepository> ProjectEditor<P, L> {
    pub fn new(projects: P, lookups: L) -> Self {
        Self {
            projects,
            resolver: ReferenceResolver::new(lookups),
        }
    }

    /// Runs the creation flow and inserts the project in a single write.
    pub fn create_project<C: Console + ?Sized>(&self, console: &mut C) -> CreateOutcome {
        console.clear();
        console.show(Tone::Heading, "=== Registering a new project ===");

        let outcome = match self.collect_new_project(console) {
            Ok(Some(project)) => self.insert(console, &project),
            Ok(None) => {
                warn!(
                    "event=project_create module=editor status=cancelled reason=selection_failed"
                );
                console.show(
                    Tone::Failure,
                    "Operation cancelled due to a failed data selection.",
                );
                CreateOutcome::SelectionFailed
            }
            Err(err) => {
                report_abort(console, "project_create", &err);
                CreateOutcome::Aborted
            }
        };

        console.pause();
        outcome
    }

    /// Runs the update flow for one project chosen by id.
    pub fn update_project<C: Console + ?Sized>(&self, console: &mut C) -> UpdateOutcome {
        console.clear();
        console.show(Tone::Heading, "=== Updating a project ===");

        let outcome = match self.run_update(console) {
            Ok(outcome) => outcome,
            Err(err) => {
                report_abort(console, "project_update", &err);
                UpdateOutcome::Aborted
            }
        };

        console.pause();
        outcome
    }

    fn collect_new_project<C: Console + ?Sized>(
        &self,
        console: &mut C,
    ) -> Result<Option<NewProject>, PromptError> {
        let raw = ask(console, "Project description: ")?;
        let description = require_non_empty_text(console, raw, "Description")?;
        let raw = ask(console, "Project cost: ")?;
        let cost = require_positive_number(console, raw, "Cost")?;
        let status = require_status(console, "=== Choose the project status ===")?;

        let Some(source_type) = self.resolver.resolve(console, LookupTable::SourceTypes)? else {
            return Ok(None);
        };
        let Some(region) = self.resolver.resolve(console, LookupTable::Regions)? else {
            return Ok(None);
        };

        Ok(Some(NewProject {
            description,
            cost,
            status,
            source_type_id: source_type.id,
            region_id: region.id,
        }))
    }

    fn insert<C: Console + ?Sized>(&self, console: &mut C, project: &NewProject) -> CreateOutcome {
        match self.projects.create_project(project) {
            Ok(id) => {
                info!("event=project_create module=editor status=ok project_id={id}");
                console.show(Tone::Success, "Project registered successfully!");
                CreateOutcome::Created(id)
            }
            Err(err) => {
                error!("event=project_create module=editor status=error error={err}");
                console.show(Tone::Failure, &format!("Error registering project: {err}"));
                CreateOutcome::StoreFailed(err.to_string())
            }
        }
    }

    fn run_update<C: Console + ?Sized>(
        &self,
        console: &mut C,
    ) -> Result<UpdateOutcome, PromptError> {
        let raw = ask(console, "ID of the project to update: ")?;
        let id = require_positive_id(console, raw, "Project ID")?;

        let listing = match self.projects.get_project(id) {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                info!("event=project_update module=editor status=not_found project_id={id}");
                console.show(Tone::Failure, "No project found with the given ID.");
                return Ok(UpdateOutcome::NotFound(id));
            }
            Err(err) => {
                error!(
                    "event=project_update module=editor status=error project_id={id} error_code=fetch_failed error={err}"
                );
                console.show(Tone::Failure, &format!("Error updating project: {err}"));
                return Ok(UpdateOutcome::StoreFailed(err.to_string()));
            }
        };

        let mut session = EditSession::load(listing);
        match self.edit_until_finished(console, &mut session) {
            Ok(()) => Ok(self.commit(console, &mut session)),
            Err(err) => {
                session.discard();
                Err(err)
            }
        }
    }

    fn edit_until_finished<C: Console + ?Sized>(
        &self,
        console: &mut C,
        session: &mut EditSession,
    ) -> Result<(), PromptError> {
        loop {
            console.clear();
            console.show(Tone::Heading, "=== Current project information ===");
            for line in detail_lines(session.working_listing()) {
                console.show(Tone::Plain, &line);
            }

            console.show(Tone::Heading, "=== Choose the field to modify ===");
            for (position, (_, label)) in FIELD_MENU.iter().enumerate() {
                console.show(Tone::Plain, &format!("{}. {label}", position + 1));
            }

            let raw = ask(console, &format!("Choose an option (1-{}): ", FIELD_MENU.len()))?;
            match parse_menu_choice(&raw, FIELD_MENU.len()).map(|index| FIELD_MENU[index].0) {
                Ok(FieldAction::Finish) => return Ok(()),
                Ok(action) => self.apply_field(console, session, action)?,
                Err(_) => console.show(Tone::Failure, "Invalid option. Try again."),
            }

            let again = ask(console, "Modify another field? (y/n): ")?;
            if !again.trim().eq_ignore_ascii_case("y") {
                return Ok(());
            }
        }
    }

    fn apply_field<C: Console + ?Sized>(
        &self,
        console: &mut C,
        session: &mut EditSession,
        action: FieldAction,
    ) -> Result<(), PromptError> {
        match action {
            FieldAction::Description => {
                let raw = ask(console, "New project description: ")?;
                match session.edit_description(&raw) {
                    Ok(()) => console.show(Tone::Success, "Description updated."),
                    Err(_) => console.show(Tone::Failure, "The description cannot be empty."),
                }
            }
            FieldAction::Cost => {
                let raw = ask(console, "New project cost: ")?;
                match session.edit_cost(&raw) {
                    Ok(_) => console.show(Tone::Success, "Cost updated."),
                    Err(_) => console.show(Tone::Failure, "The cost must be a positive number."),
                }
            }
            FieldAction::Status => {
                let status = require_status(console, "=== Choose the new project status ===")?;
                session.set_status(status);
                console.show(
                    Tone::Success,
                    &format!("Status updated to '{}'.", status.label()),
                );
            }
            FieldAction::SourceType => {
                match self.resolver.resolve(console, LookupTable::SourceTypes)? {
                    Some(row) => {
                        session.set_source_type(row);
                        console.show(Tone::Success, "Source type updated.");
                    }
                    None => console.show(Tone::Notice, "Source type left unchanged."),
                }
            }
            FieldAction::Region => match self.resolver.resolve(console, LookupTable::Regions)? {
                Some(row) => {
                    session.set_region(row);
                    console.show(Tone::Success, "Region updated.");
                }
                None => console.show(Tone::Notice, "Region left unchanged."),
            },
            FieldAction::Finish => {}
        }
        Ok(())
    }

    fn commit<C: Console + ?Sized>(
        &self,
        console: &mut C,
        session: &mut EditSession,
    ) -> UpdateOutcome {
        let Some(project) = session.pending_write().cloned() else {
            session.mark_saved();
            info!(
                "event=project_update module=editor status=unchanged project_id={}",
                session.original().id
            );
            console.show(Tone::Notice, "No changes were made.");
            return UpdateOutcome::NoChanges;
        };

        match self.projects.update_project(&project) {
            Ok(()) => {
                session.mark_saved();
                info!(
                    "event=project_update module=editor status=ok project_id={}",
                    project.id
                );
                console.show(Tone::Success, "Project updated successfully!");
                UpdateOutcome::Updated(project)
            }
            Err(err) => {
                session.discard();
                error!(
                    "event=project_update module=editor status=error project_id={} error={}",
                    project.id, err
                );
                console.show(Tone::Failure, &format!("Error updating project: {err}"));
                UpdateOutcome::StoreFailed(err.to_string())
            }
        }
    }
}

fn report_abort<C: Console + ?Sized>(console: &mut C, event: &str, err: &PromptError) {
    warn!("event={event} module=editor status=aborted error={err}");
    console.show(Tone::Failure, "Operation aborted. Nothing was saved.");
}
