//! Dashboard domain model.
//!
//! Plain records shared by loaders, persistence, and services. Storage and
//! wire shapes live elsewhere; these types only carry data.
//!
//! # Invariants
//! - Identity fields are random v4 UUID strings generated at creation time
//!   (`new_id`) and never reused.
//! - References between records (`LayoutItem::item_id`,
//!   `MetricConfiguration::query_id`, `MetricRecord::id`) are not enforced.

pub mod batch;
pub mod configuration;
pub mod metric;

use uuid::Uuid;

pub use batch::SeedBatch;
pub use configuration::{LayoutItem, MetricConfiguration, MetricConfigurationAggregate, Query};
pub use metric::{MetricRecord, Row};

/// Generates a fresh identity token.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Record kinds that can be seeded or counted as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    MetricConfiguration,
    LayoutItem,
    Query,
    MetricRecord,
}

impl RecordType {
    /// Storage table holding rows of this kind.
    pub fn table(self) -> &'static str {
        match self {
            RecordType::MetricConfiguration => "metric_configurations",
            RecordType::LayoutItem => "layout_items",
            RecordType::Query => "queries",
            RecordType::MetricRecord => "metrics",
        }
    }

    /// Stable name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::MetricConfiguration => "metric_configuration",
            RecordType::LayoutItem => "layout_item",
            RecordType::Query => "query",
            RecordType::MetricRecord => "metric_record",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
