//! Main menu loop.
//!
//! # Invariants
//! - Each menu operation opens its own database connection and drops it
//!   before the menu is shown again, on success and failure alike.

use crate::config::AppConfig;
use ecofleet_core::db::open_db;
use ecofleet_core::{
    Console, ProjectEditor, ProjectQueries, ProjectRemoval, SqliteLookupRepository,
    SqliteProjectRepository, Tone,
};
use log::{error, info};
use rusqlite::Connection;

const MAIN_MENU: [&str; 6] = [
    "Register a new project",
    "Update an existing project",
    "Delete a project by ID",
    "Query projects by status",
    "Export projects to JSON or spreadsheet",
    "Exit",
];

pub struct App<C: Console> {
    config: AppConfig,
    console: C,
}

impl<C: Console> App<C> {
    pub fn new(config: AppConfig, console: C) -> Self {
        Self { config, console }
    }

    /// Runs until the operator picks "Exit" or input ends.
    pub fn run(&mut self) {
        loop {
            self.show_menu();
            let choice = match self.console.read_line("Choose an option: ") {
                Ok(Some(choice)) => choice,
                Ok(None) => break,
                Err(err) => {
                    error!("event=menu module=cli status=error error={err}");
                    break;
                }
            };

            match choice.trim() {
                "1" => self.with_connection(|conn, console| {
                    editor(conn).create_project(console);
                }),
                "2" => self.with_connection(|conn, console| {
                    editor(conn).update_project(console);
                }),
                "3" => self.with_connection(|conn, console| {
                    ProjectRemoval::new(SqliteProjectRepository::new(conn))
                        .delete_project(console);
                }),
                "4" => self.with_connection(|conn, console| {
                    ProjectQueries::new(SqliteProjectRepository::new(conn))
                        .query_projects(console);
                }),
                "5" => {
                    let export_dir = self.config.export_dir.clone();
                    self.with_connection(|conn, console| {
                        ProjectQueries::new(SqliteProjectRepository::new(conn))
                            .export_projects(console, &export_dir);
                    })
                }
                "6" => break,
                _ => {
                    self.console.show(Tone::Failure, "Invalid option. Try again.");
                    self.console.pause();
                }
            }
        }

        info!("event=app_exit module=cli status=ok");
        self.console.show(Tone::Success, "Leaving the system...");
    }

    fn show_menu(&mut self) {
        self.console.clear();
        self.console.show(Tone::Heading, "=== MAIN MENU ===");
        for (position, label) in MAIN_MENU.iter().enumerate() {
            self.console.show(Tone::Plain, &format!("{}. {label}", position + 1));
        }
    }

    fn with_connection<F>(&mut self, operation: F)
    where
        F: FnOnce(&Connection, &mut C),
    {
        match open_db(&self.config.db_path) {
            Ok(conn) => operation(&conn, &mut self.console),
            Err(err) => {
                self.console.show(
                    Tone::Failure,
                    &format!("Error connecting to the database: {err}"),
                );
                self.console.pause();
            }
        }
    }
}

fn editor(
    conn: &Connection,
) -> ProjectEditor<SqliteProjectRepository<'_>, SqliteLookupRepository<'_>> {
    ProjectEditor::new(
        SqliteProjectRepository::new(conn),
        SqliteLookupRepository::new(conn),
    )
}
