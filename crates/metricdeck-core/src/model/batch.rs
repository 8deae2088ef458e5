//! Same-typed batches of records, as produced by seed loaders.

use super::configuration::{LayoutItem, MetricConfiguration, Query};
use super::metric::MetricRecord;
use super::RecordType;

#[derive(Debug, Clone, PartialEq)]
pub enum SeedBatch {
    MetricConfigurations(Vec<MetricConfiguration>),
    LayoutItems(Vec<LayoutItem>),
    Queries(Vec<Query>),
    MetricRecords(Vec<MetricRecord>),
}

impl SeedBatch {
    /// Empty batch of the given kind.
    pub fn empty(record_type: RecordType) -> Self {
        match record_type {
            RecordType::MetricConfiguration => SeedBatch::MetricConfigurations(Vec::new()),
            RecordType::LayoutItem => SeedBatch::LayoutItems(Vec::new()),
            RecordType::Query => SeedBatch::Queries(Vec::new()),
            RecordType::MetricRecord => SeedBatch::MetricRecords(Vec::new()),
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            SeedBatch::MetricConfigurations(_) => RecordType::MetricConfiguration,
            SeedBatch::LayoutItems(_) => RecordType::LayoutItem,
            SeedBatch::Queries(_) => RecordType::Query,
            SeedBatch::MetricRecords(_) => RecordType::MetricRecord,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SeedBatch::MetricConfigurations(v) => v.len(),
            SeedBatch::LayoutItems(v) => v.len(),
            SeedBatch::Queries(v) => v.len(),
            SeedBatch::MetricRecords(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
