//! Project store bootstrap.
//!
//! # Responsibility
//! - Open and configure the SQLite file holding projects and reference data.
//! - Bring its schema to the version this build understands.
//! - Refuse stores whose lookup tables were never seeded.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - One top-level operation owns one connection; it is dropped before the
//!   operator is prompted for the next operation.

use crate::model::lookup::LookupTable;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use migrations::{ensure_reference_data, latest_version};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures raised while bringing a project store into a usable state.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer EcoFleet build.
    SchemaTooNew { found: u32, supported: u32 },
    /// A lookup table the reference resolver reads holds no rows after seeding.
    MissingReferenceData(LookupTable),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "project store uses schema {found}, this build reads up to {supported}"
            ),
            Self::MissingReferenceData(table) => {
                write!(f, "reference table {table} has no rows")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
