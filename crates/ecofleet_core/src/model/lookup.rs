//! Read-only lookup tables referenced by projects.
//!
//! # Responsibility
//! - Own the allow-list of tables/columns the resolver may query.
//! - Define the `(id, label)` row shape rendered as numbered choices.
//!
//! # Invariants
//! - SQL identifiers are only ever taken from `LookupTable` constants, never
//!   from caller-provided strings.

use super::project::LookupId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lookup table known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupTable {
    SourceTypes,
    Regions,
}

impl LookupTable {
    pub const ALL: [LookupTable; 2] = [LookupTable::SourceTypes, LookupTable::Regions];

    pub fn table_name(self) -> &'static str {
        match self {
            Self::SourceTypes => "source_types",
            Self::Regions => "regions",
        }
    }

    pub fn id_column(self) -> &'static str {
        "id"
    }

    pub fn label_column(self) -> &'static str {
        "name"
    }

    /// Heading shown above the numbered choice list.
    pub fn prompt_title(self) -> &'static str {
        match self {
            Self::SourceTypes => "Select the energy source type",
            Self::Regions => "Select the sustainable region",
        }
    }

    /// Resolves a `(table, id column, label column)` triple against the
    /// allow-list. Comparison ignores ASCII case and surrounding whitespace.
    pub fn from_columns(
        table: &str,
        id_column: &str,
        label_column: &str,
    ) -> Result<Self, LookupError> {
        let matches = |expected: &str, actual: &str| expected.eq_ignore_ascii_case(actual.trim());
        Self::ALL
            .into_iter()
            .find(|candidate| {
                matches(candidate.table_name(), table)
                    && matches(candidate.id_column(), id_column)
                    && matches(candidate.label_column(), label_column)
            })
            .ok_or_else(|| LookupError::NotAllowed {
                table: table.to_string(),
                id_column: id_column.to_string(),
                label_column: label_column.to_string(),
            })
    }
}

impl Display for LookupTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

/// One selectable lookup entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRow {
    pub id: LookupId,
    pub label: String,
}

impl LookupRow {
    pub fn new(id: LookupId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    NotAllowed {
        table: String,
        id_column: String,
        label_column: String,
    },
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAllowed {
                table,
                id_column,
                label_column,
            } => write!(
                f,
                "lookup `{table}({id_column}, {label_column})` is not an allowed reference table"
            ),
        }
    }
}

impl Error for LookupError {}
