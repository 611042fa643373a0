//! Schema history for the `parts` store.
//!
//! Each step is an embedded SQL script tagged with the `PRAGMA user_version`
//! it brings the database to. Steps run in registry order, all pending steps
//! inside one transaction.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "parts",
        sql: include_str!("0001_parts.sql"),
    },
    SchemaStep {
        version: 2,
        name: "parts_live_index",
        sql: include_str!("0002_parts_live_index.sql"),
    },
];

/// Schema version this binary migrates to.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Schema version recorded on `conn`; `0` for a fresh database.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings `conn` up to [`latest_version`] and returns how many steps ran.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database was written by a newer binary.
/// - `Sqlite` when a step fails; the transaction is rolled back and the
///   recorded version is unchanged.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let from = current_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending = pending_steps(from);
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for step in pending {
        debug!(
            "event=db_migrate_step module=db version={} name={}",
            step.version, step.name
        );
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from} to_version={latest} applied={}",
        pending.len()
    );
    Ok(pending.len())
}

fn pending_steps(from: u32) -> &'static [SchemaStep] {
    let first = SCHEMA_STEPS
        .iter()
        .position(|step| step.version > from)
        .unwrap_or(SCHEMA_STEPS.len());
    &SCHEMA_STEPS[first..]
}
