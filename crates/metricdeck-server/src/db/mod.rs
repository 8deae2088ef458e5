//! SQLite storage bootstrap.
//!
//! A `Database` is a cheap, cloneable handle describing where the store
//! lives. Every unit of work opens its own connection through
//! [`Database::connect`]; connections are never shared across concurrent
//! operations.
//!
//! # Invariants
//! - Migrations run once in [`Database::open`] before any connection is
//!   handed out.
//! - Connections run in WAL mode with a busy timeout so concurrent requests
//!   wait on each other instead of failing.

pub mod migrations;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rusqlite::Connection;

use metricdeck_core::error::{MetricDeckError, Result};

use crate::config::DatabaseSection;

/// Maps storage failures onto the shared error type with some context.
pub trait StorageResultExt<T> {
    fn storage(self, context: &str) -> Result<T>;
}

impl<T> StorageResultExt<T> for rusqlite::Result<T> {
    fn storage(self, context: &str) -> Result<T> {
        self.map_err(|e| MetricDeckError::Storage(format!("{context}: {e}")))
    }
}

#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration,
}

impl Database {
    /// Opens (creating if needed) the database file and applies migrations.
    pub fn open(cfg: &DatabaseSection) -> Result<Self> {
        let started_at = Instant::now();
        let db = Self {
            path: PathBuf::from(&cfg.path),
            busy_timeout: Duration::from_millis(cfg.busy_timeout_ms),
        };

        if let Some(parent) = db.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut conn = db.connect()?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .storage("enable wal")?;
        if let Err(e) = migrations::apply_migrations(&mut conn) {
            tracing::error!(path = %db.path.display(), error = %e, "database bootstrap failed");
            return Err(e);
        }

        tracing::info!(
            path = %db.path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            schema_version = migrations::latest_version(),
            "database opened"
        );
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a new connection configured for one unit of work.
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path).storage("open connection")?;
        conn.busy_timeout(self.busy_timeout)
            .storage("set busy timeout")?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .storage("configure connection")?;
        Ok(conn)
    }
}
