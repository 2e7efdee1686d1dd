//! Lookup table reads for reference resolution.
//!
//! # Responsibility
//! - Fetch `(id, label)` pairs from allow-listed reference tables.
//!
//! # Invariants
//! - Rows are returned in ascending id order, so the same position maps to
//!   the same id across calls against unchanged data.
//! - This module never writes to lookup tables.

use crate::model::lookup::{LookupRow, LookupTable};
use crate::repo::project_repo::RepoResult;
use rusqlite::Connection;

/// Read contract over reference tables.
pub trait LookupRepository {
    fn list_rows(&self, table: LookupTable) -> RepoResult<Vec<LookupRow>>;
}

impl<R: LookupRepository + ?Sized> LookupRepository for &R {
    fn list_rows(&self, table: LookupTable) -> RepoResult<Vec<LookupRow>> {
        (**self).list_rows(table)
    }
}

/// SQLite-backed lookup repository.
pub struct SqliteLookupRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLookupRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LookupRepository for SqliteLookupRepository<'_> {
    fn list_rows(&self, table: LookupTable) -> RepoResult<Vec<LookupRow>> {
        let sql = format!(
            "SELECT {id}, {label} FROM {table} ORDER BY {id} ASC;",
            id = table.id_column(),
            label = table.label_column(),
            table = table.table_name(),
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(LookupRow::new(row.get(0)?, row.get::<_, String>(1)?))
        })?;
        let mut collected = Vec::new();
        for row in rows {
            collected.push(row?);
        }

        Ok(collected)
    }
}
