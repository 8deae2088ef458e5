//! Persistence capabilities and their SQLite implementations.
//!
//! Each capability is a small trait. Services ask a unit of work for one via
//! `uow.persistence_factory::<dyn Trait>()` and never name the backing type.

pub mod readers;
pub mod seeder;
pub mod writers;

use chrono::NaiveDate;

use metricdeck_core::error::Result;
use metricdeck_core::model::{
    MetricConfiguration, MetricConfigurationAggregate, MetricRecord, Row, SeedBatch,
};

use crate::uow::{Capability, PersistenceRegistry};

pub use readers::{
    SqliteDbHealthReader, SqliteMetricAggregateReader, SqliteMetricConfigurationReader,
    SqliteMetricRecordsReader,
};
pub use seeder::{SeedOutcome, SqliteDataSeeder};
pub use writers::{SqliteMetricAggregateWriter, SqliteMetricRecordWriter};

/// Date window applied to a configuration's stored query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordsWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of days before today.
    pub day_range: i64,
}

/// Values offered to a query template. Only the names the template declares
/// (`:start_date`, `:end_date`, `:day_range`, `:query_id`) are bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsParams {
    pub query_id: Option<String>,
    pub window: RecordsWindow,
}

/// Trivial liveness ping against storage.
pub trait DbHealthReader {
    /// `Some` when the ping returned a row.
    fn ping(&self) -> Result<Option<i64>>;
}

pub trait MetricAggregateReader {
    fn get_aggregate(&self, id: &str) -> Result<Option<MetricConfigurationAggregate>>;
}

pub trait MetricConfigurationReader {
    fn get_configuration(&self, id: &str) -> Result<Option<MetricConfiguration>>;
}

pub trait MetricRecordsReader {
    /// Executes `template` and returns its rows as JSON objects.
    fn fetch_records(&self, template: &str, params: &RecordsParams) -> Result<Vec<Row>>;
}

pub trait MetricAggregateWriter {
    /// Stages the configuration, its query (if any) and its layouts.
    fn add_aggregate(&self, aggregate: &MetricConfigurationAggregate) -> Result<()>;
}

pub trait MetricRecordWriter {
    fn add_record(&self, record: &MetricRecord) -> Result<()>;
}

/// Idempotent bulk insert: a batch lands only in an empty table.
pub trait DataSeeder {
    fn seed(&self, batch: &SeedBatch) -> Result<SeedOutcome>;
}

impl Capability for dyn DbHealthReader {
    const NAME: &'static str = "DbHealthReader";
    type Instance<'s> = Box<dyn DbHealthReader + 's>;
}

impl Capability for dyn MetricAggregateReader {
    const NAME: &'static str = "MetricAggregateReader";
    type Instance<'s> = Box<dyn MetricAggregateReader + 's>;
}

impl Capability for dyn MetricConfigurationReader {
    const NAME: &'static str = "MetricConfigurationReader";
    type Instance<'s> = Box<dyn MetricConfigurationReader + 's>;
}

impl Capability for dyn MetricRecordsReader {
    const NAME: &'static str = "MetricRecordsReader";
    type Instance<'s> = Box<dyn MetricRecordsReader + 's>;
}

impl Capability for dyn MetricAggregateWriter {
    const NAME: &'static str = "MetricAggregateWriter";
    const WRITES: bool = true;
    type Instance<'s> = Box<dyn MetricAggregateWriter + 's>;
}

impl Capability for dyn MetricRecordWriter {
    const NAME: &'static str = "MetricRecordWriter";
    const WRITES: bool = true;
    type Instance<'s> = Box<dyn MetricRecordWriter + 's>;
}

impl Capability for dyn DataSeeder {
    const NAME: &'static str = "DataSeeder";
    const WRITES: bool = true;
    type Instance<'s> = Box<dyn DataSeeder + 's>;
}

/// Registry wired to the SQLite implementation of every capability.
pub fn sqlite_registry() -> PersistenceRegistry {
    let mut registry = PersistenceRegistry::new();
    registry
        .register::<dyn DbHealthReader>(readers::health_reader)
        .register::<dyn MetricAggregateReader>(readers::aggregate_reader)
        .register::<dyn MetricConfigurationReader>(readers::configuration_reader)
        .register::<dyn MetricRecordsReader>(readers::records_reader)
        .register::<dyn MetricAggregateWriter>(writers::aggregate_writer)
        .register::<dyn MetricRecordWriter>(writers::record_writer)
        .register::<dyn DataSeeder>(seeder::data_seeder);
    registry
}
