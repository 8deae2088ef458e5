//! Embedded schema migrations.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - The applied version is mirrored to `PRAGMA user_version`.

use rusqlite::Connection;

use metricdeck_core::error::{MetricDeckError, Result};

use super::StorageResultExt;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations in one transaction.
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    let current = current_user_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(MetricDeckError::Storage(format!(
            "database schema version {current} is newer than supported {latest}"
        )));
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction().storage("begin migration")?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql).storage("apply migration")?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            .storage("record migration version")?;
        tracing::info!(version = migration.version, "schema migration applied");
    }
    tx.commit().storage("commit migration")?;

    Ok(())
}

pub fn current_user_version(conn: &Connection) -> Result<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))
        .storage("read user_version")
}
