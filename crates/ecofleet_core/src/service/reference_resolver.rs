//! Reference resolver: numbered-menu selection of lookup rows.
//!
//! # Responsibility
//! - Render a lookup table as a 1-based numbered list.
//! - Map the operator's position back to the row's stored identifier.
//!
//! # Invariants
//! - The returned id and label always come from the same fetched row.
//! - Store failures and empty tables yield "no selection" (`Ok(None)`), never
//!   an error past this boundary. Only operator abort is propagated.

use crate::console::{Console, PromptError, Tone};
use crate::model::lookup::{LookupRow, LookupTable};
use crate::model::project::LookupId;
use crate::repo::lookup_repo::LookupRepository;
use crate::validation::require_menu_choice;
use log::{info, warn};

/// Resolves operator choices against one lookup repository.
pub struct ReferenceResolver<L: LookupRepository> {
    lookups: L,
}

impl<L: LookupRepository> ReferenceResolver<L> {
    pub fn new(lookups: L) -> Self {
        Self { lookups }
    }

    /// Lets the operator pick one row of `table` by position.
    pub fn resolve<C: Console + ?Sized>(
        &self,
        console: &mut C,
        table: LookupTable,
    ) -> Result<Option<LookupRow>, PromptError> {
        let rows = match self.lookups.list_rows(table) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(
                    "event=lookup_resolve module=resolver status=error table={} error_code=fetch_failed error={}",
                    table, err
                );
                console.show(
                    Tone::Failure,
                    &format!("Error listing options in table {table}: {err}"),
                );
                return Ok(None);
            }
        };

        if rows.is_empty() {
            info!(
                "event=lookup_resolve module=resolver status=empty table={}",
                table
            );
            console.show(Tone::Failure, &format!("No data found in table {table}."));
            return Ok(None);
        }

        console.show(Tone::Heading, table.prompt_title());
        for (position, row) in rows.iter().enumerate() {
            console.show(Tone::Plain, &format!("{}. {}", position + 1, row.label));
        }

        let index = require_menu_choice(console, rows.len())?;
        let chosen = rows.into_iter().nth(index);
        if let Some(row) = chosen.as_ref() {
            info!(
                "event=lookup_resolve module=resolver status=ok table={} id={}",
                table, row.id
            );
        }
        Ok(chosen)
    }

    /// Name-based entry point: validates the triple against the allow-list
    /// before resolving. Unknown tables report and yield no selection.
    pub fn resolve_columns<C: Console + ?Sized>(
        &self,
        console: &mut C,
        table_name: &str,
        id_column: &str,
        label_column: &str,
    ) -> Result<Option<LookupId>, PromptError> {
        match LookupTable::from_columns(table_name, id_column, label_column) {
            Ok(table) => Ok(self.resolve(console, table)?.map(|row| row.id)),
            Err(err) => {
                warn!(
                    "event=lookup_resolve module=resolver status=error error_code=table_not_allowed"
                );
                console.show(Tone::Failure, &err.to_string());
                Ok(None)
            }
        }
    }
}
