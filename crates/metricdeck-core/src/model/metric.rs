//! Time-series metric rows.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One materialized row of a query result: column name -> JSON value.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// A single observation attached to a configuration's query.
///
/// Immutable once persisted; there is no deletion path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Generated identity of this row.
    pub metric_id: String,
    /// Query id of the owning configuration.
    pub id: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub obsolescence_val: Option<f64>,
    pub obsolescence: Option<f64>,
    pub parts_flagged: Option<i64>,
    pub alert_type: Option<String>,
    pub alert_category: Option<String>,
}
