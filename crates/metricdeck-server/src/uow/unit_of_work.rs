//! Transactional scope over one storage session.
//!
//! # Contract
//! - Entering a scope opens a new connection and a deferred transaction.
//!   SQLite's write lock is taken only once a writing capability is
//!   requested, so read-only scopes never wait on other scopes.
//! - Work that returns an error is rolled back and the error is re-raised
//!   unchanged.
//! - Only [`UnitOfWork::commit`] makes changes durable; anything staged after
//!   the last commit is discarded when the scope closes.
//! - The connection is closed on exit regardless of outcome.
//! - Scopes do not nest; every scope owns its own session.

use std::cell::Cell;
use std::sync::Arc;

use rusqlite::Connection;
use tracing::Span;

use metricdeck_core::error::{MetricDeckError, Result};

use super::registry::{Capability, PersistenceRegistry};
use crate::db::{Database, StorageResultExt};

/// What a capability constructor may depend on: the connection and the
/// unit of work's logging span.
pub struct Session {
    conn: Connection,
    span: Span,
}

impl Session {
    pub fn new(conn: Connection, span: Span) -> Self {
        Self { conn, span }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    #[cfg(test)]
    pub(crate) fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().storage("open in-memory connection")?;
        Ok(Self::new(conn, Span::none()))
    }
}

/// Transaction state of a unit of work's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Idle,
    /// Deferred transaction: takes no lock until storage is touched, and
    /// readers never wait on other scopes.
    Read,
    /// Holds SQLite's write lock from the start.
    Write,
}

pub struct UnitOfWork {
    session: Session,
    registry: Arc<PersistenceRegistry>,
    state: Cell<TxState>,
}

impl UnitOfWork {
    /// Opens a session on `db` and starts a deferred transaction.
    pub fn begin(db: &Database, registry: Arc<PersistenceRegistry>) -> Result<Self> {
        let conn = db.connect()?;
        let span = tracing::debug_span!("unit_of_work");
        let uow = Self {
            session: Session::new(conn, span),
            registry,
            state: Cell::new(TxState::Idle),
        };
        uow.open(TxState::Read)?;
        Ok(uow)
    }

    /// Builds a fresh instance of capability `C` bound to this session.
    ///
    /// Writing capabilities take the write lock before they are handed out;
    /// an untouched read transaction is restarted as a write transaction.
    /// After a commit the next capability starts a new transaction.
    pub fn persistence_factory<C: Capability + ?Sized>(&self) -> Result<C::Instance<'_>> {
        let factory = self.registry.resolve::<C>()?;
        match (self.state.get(), C::WRITES) {
            (TxState::Idle, false) => self.open(TxState::Read)?,
            (TxState::Idle, true) => self.open(TxState::Write)?,
            (TxState::Read, true) => {
                self.end("ROLLBACK;", "restart as write")?;
                self.open(TxState::Write)?;
            }
            (TxState::Read, false) | (TxState::Write, _) => {}
        }
        Ok(factory(&self.session))
    }

    /// Commits everything staged so far. Later writes go into a new
    /// transaction that must be committed again to persist.
    pub fn commit(&self) -> Result<()> {
        if self.state.get() == TxState::Idle {
            return Ok(());
        }
        self.end("COMMIT;", "commit")?;
        self.session.span.in_scope(|| tracing::debug!("unit of work committed"));
        Ok(())
    }

    /// Discards everything staged since the last commit.
    pub fn rollback(&self) -> Result<()> {
        if self.state.get() == TxState::Idle {
            return Ok(());
        }
        self.end("ROLLBACK;", "rollback")
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Ends the scope: drops uncommitted work and closes the connection.
    pub fn close(self) -> Result<()> {
        self.rollback()
    }

    fn open(&self, state: TxState) -> Result<()> {
        let sql = match state {
            TxState::Write => "BEGIN IMMEDIATE;",
            TxState::Read | TxState::Idle => "BEGIN DEFERRED;",
        };
        self.session.conn.execute_batch(sql).storage("begin")?;
        self.state.set(state);
        Ok(())
    }

    fn end(&self, sql: &str, context: &str) -> Result<()> {
        self.session.conn.execute_batch(sql).storage(context)?;
        self.state.set(TxState::Idle);
        Ok(())
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if self.state.get() != TxState::Idle {
            if let Err(e) = self.session.conn.execute_batch("ROLLBACK;") {
                tracing::warn!(error = %e, "rollback on drop failed");
            }
            self.state.set(TxState::Idle);
        }
    }
}

/// Opens unit-of-work scopes against one database and registry.
#[derive(Clone)]
pub struct UnitOfWorkFactory {
    db: Database,
    registry: Arc<PersistenceRegistry>,
}

impl UnitOfWorkFactory {
    pub fn new(db: Database, registry: Arc<PersistenceRegistry>) -> Self {
        Self { db, registry }
    }

    pub fn registry(&self) -> &PersistenceRegistry {
        &self.registry
    }

    /// Runs `work` inside a scope on the current thread.
    pub fn run<T>(&self, work: impl FnOnce(&UnitOfWork) -> Result<T>) -> Result<T> {
        let uow = UnitOfWork::begin(&self.db, Arc::clone(&self.registry))?;

        match work(&uow) {
            Ok(value) => {
                uow.close()?;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(error = %err, "unit of work failed; rolling back");
                if let Err(rollback_err) = uow.close() {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Runs `work` inside a scope on the blocking pool, within the caller's
    /// span.
    pub async fn scope<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&UnitOfWork) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let factory = self.clone();
        let span = Span::current();
        tokio::task::spawn_blocking(move || span.in_scope(|| factory.run(work)))
            .await
            .map_err(|e| MetricDeckError::Internal(format!("unit of work task failed: {e}")))?
    }
}
