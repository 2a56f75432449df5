//! Embedded schema migrations for the profile/document/alarm store.
//!
//! # Invariants
//! - Steps are listed in strictly increasing `version` order.
//! - All pending steps run in one transaction; `PRAGMA user_version` moves
//!   with each step, so a failed step leaves the file at the last good
//!   version.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

struct MigrationStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[MigrationStep] = &[
    MigrationStep {
        version: 1,
        name: "profiles_documents",
        sql: include_str!("0001_profiles_documents.sql"),
    },
    MigrationStep {
        version: 2,
        name: "alarms",
        sql: include_str!("0002_alarms.sql"),
    },
];

/// Schema version this binary migrates to.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// Fails with [`DbError::UnsupportedSchemaVersion`] when the file is newer
/// than this binary.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest_supported = latest_version();
    if from_version > latest_supported {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported,
        });
    }

    let pending: Vec<&MigrationStep> = STEPS
        .iter()
        .filter(|step| step.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        run_step(&tx, step)?;
    }
    tx.commit()?;
    Ok(())
}

fn run_step(tx: &Transaction<'_>, step: &MigrationStep) -> DbResult<()> {
    tx.execute_batch(step.sql)
        .and_then(|()| tx.pragma_update(None, "user_version", step.version))
        .map_err(|source| DbError::Migration {
            version: step.version,
            source,
        })?;
    info!(
        "event=db_migrate module=db status=ok version={} step={}",
        step.version, step.name
    );
    Ok(())
}
