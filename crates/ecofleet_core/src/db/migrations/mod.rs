//! Schema steps for the project store.
//!
//! # Responsibility
//! - Hold the ordered list of schema steps (DDL, then reference data seed).
//! - Run every pending step, plus its post-condition, in one transaction.
//!
//! # Invariants
//! - Step versions strictly increase; `PRAGMA user_version` records the last
//!   step applied.
//! - A step whose post-condition fails rolls the whole upgrade back.

use crate::db::{DbError, DbResult};
use crate::model::lookup::LookupTable;
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
    check: fn(&Connection) -> DbResult<()>,
}

const STEPS: [SchemaStep; 2] = [
    SchemaStep {
        version: 1,
        name: "project_tables",
        sql: include_str!("0001_init.sql"),
        check: no_check,
    },
    SchemaStep {
        version: 2,
        name: "seed_reference_data",
        sql: include_str!("0002_seed_reference_data.sql"),
        check: ensure_reference_data,
    },
];

/// Schema version written by the newest step of this build.
pub fn latest_version() -> u32 {
    STEPS[STEPS.len() - 1].version
}

/// Upgrades `conn` to [`latest_version`].
///
/// # Errors
/// - `SchemaTooNew` when the store was written by a newer build.
/// - `MissingReferenceData` when seeding left a lookup table empty.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&SchemaStep> = STEPS.iter().filter(|step| step.version > found).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.sql)?;
        (step.check)(&tx)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=ok version={} step={}",
            step.version, step.name
        );
    }
    tx.commit()?;
    Ok(())
}

/// Confirms every lookup table holds at least one row.
///
/// The reference resolver numbers these rows for the operator, so a store
/// without them cannot register any project.
pub fn ensure_reference_data(conn: &Connection) -> DbResult<()> {
    for table in LookupTable::ALL {
        let rows: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.table_name()),
            [],
            |row| row.get(0),
        )?;
        if rows == 0 {
            return Err(DbError::MissingReferenceData(table));
        }
    }
    Ok(())
}

fn no_check(_conn: &Connection) -> DbResult<()> {
    Ok(())
}
