//! Metric configuration, its layouts, and its query.

use serde::{Deserialize, Serialize};

use super::metric::Row;

/// Grid placement of a configuration's widget under one breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutItem {
    pub id: String,
    /// Owning configuration id.
    pub item_id: String,
    /// Responsive size class (`sm`, `md`, `lg`, ...).
    pub breakpoint: String,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
    /// Locks drag/resize when `Some(true)`.
    #[serde(rename = "static")]
    pub is_static: Option<bool>,
}

/// A parameterized query template. Opaque text handed to storage verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub id: String,
    pub query: String,
}

/// Write-oriented configuration shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricConfiguration {
    pub id: String,
    pub query_id: Option<String>,
    pub is_editable: bool,
}

/// Read-oriented composition of a configuration with its layouts and query.
///
/// `records` is filled by the records-fetch step and never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricConfigurationAggregate {
    pub id: String,
    pub query_id: Option<String>,
    pub is_editable: bool,
    pub layouts: Vec<LayoutItem>,
    pub query: Option<Query>,
    pub records: Vec<Row>,
}

impl MetricConfigurationAggregate {
    /// Base configuration fields of this aggregate.
    pub fn configuration(&self) -> MetricConfiguration {
        MetricConfiguration {
            id: self.id.clone(),
            query_id: self.query_id.clone(),
            is_editable: self.is_editable,
        }
    }

    /// Attaches a query, making its id the configuration's `query_id`.
    pub fn attach_query(&mut self, query: Query) {
        self.query_id = Some(query.id.clone());
        self.query = Some(query);
    }
}
