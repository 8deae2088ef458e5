//! Idempotent bulk insert.
//!
//! "Already seeded" means the target table holds at least one row. There is
//! no per-record check: a table partially filled by other means is left as
//! it is.

use rusqlite::Connection;
use tracing::Span;

use metricdeck_core::error::Result;
use metricdeck_core::model::SeedBatch;

use super::writers::{insert_configuration, insert_layout, insert_metric_record, insert_query};
use super::DataSeeder;
use crate::db::StorageResultExt;
use crate::uow::Session;

pub fn data_seeder(session: &Session) -> Box<dyn DataSeeder + '_> {
    Box::new(SqliteDataSeeder::new(session))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The table was empty; this many rows were staged.
    Inserted(usize),
    /// The table already held rows; nothing was staged.
    Skipped { existing: u64 },
}

impl SeedOutcome {
    pub fn inserted(self) -> usize {
        match self {
            SeedOutcome::Inserted(n) => n,
            SeedOutcome::Skipped { .. } => 0,
        }
    }
}

pub struct SqliteDataSeeder<'s> {
    conn: &'s Connection,
    span: Span,
}

impl<'s> SqliteDataSeeder<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            conn: session.conn(),
            span: session.span().clone(),
        }
    }

    fn count_rows(&self, table: &str) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .storage("count rows")?;
        Ok(count.max(0) as u64)
    }
}

impl DataSeeder for SqliteDataSeeder<'_> {
    fn seed(&self, batch: &SeedBatch) -> Result<SeedOutcome> {
        let _entered = self.span.enter();
        let record_type = batch.record_type();
        tracing::info!(%record_type, rows = batch.len(), "rows entered");

        let existing = self.count_rows(record_type.table())?;
        tracing::info!(%record_type, existing, "rows found");
        if existing > 0 {
            return Ok(SeedOutcome::Skipped { existing });
        }

        match batch {
            SeedBatch::MetricConfigurations(items) => {
                for item in items {
                    insert_configuration(self.conn, item)?;
                }
            }
            SeedBatch::LayoutItems(items) => {
                for item in items {
                    insert_layout(self.conn, item)?;
                }
            }
            SeedBatch::Queries(items) => {
                for item in items {
                    insert_query(self.conn, item)?;
                }
            }
            SeedBatch::MetricRecords(items) => {
                for item in items {
                    insert_metric_record(self.conn, item)?;
                }
            }
        }

        Ok(SeedOutcome::Inserted(batch.len()))
    }
}
