//! HTTP request/response bodies and their mapping to and from the domain.

use serde::{Deserialize, Serialize};

use metricdeck_core::model::{LayoutItem, MetricConfigurationAggregate, Row};

use crate::services::{NewLayoutItem, NewMetricConfiguration, NewMetricRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub application: bool,
    pub database: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutItemContract {
    pub breakpoint: String,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
    #[serde(default, rename = "static")]
    pub is_static: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutItemResponse {
    pub id: String,
    pub item_id: String,
    #[serde(flatten)]
    pub layout: LayoutItemContract,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub id: String,
    pub is_editable: bool,
    pub records: Vec<Row>,
    pub layouts: Vec<LayoutItemResponse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMetricConfigurationRequest {
    pub is_editable: bool,
    pub query_generation_prompt: String,
    #[serde(default)]
    pub layouts: Vec<LayoutItemContract>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMetricRecordRequest {
    #[serde(default)]
    pub obsolescence_val: Option<f64>,
    #[serde(default)]
    pub obsolescence: Option<f64>,
    #[serde(default)]
    pub parts_flagged: Option<i64>,
    #[serde(default)]
    pub alert_type: Option<String>,
    #[serde(default)]
    pub alert_category: Option<String>,
}

/// Optional window parameters of `GET /metrics/:id`; gaps are filled from
/// `metrics_defaults`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsQuery {
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub day_range: Option<i64>,
}

impl From<&LayoutItem> for LayoutItemResponse {
    fn from(layout: &LayoutItem) -> Self {
        Self {
            id: layout.id.clone(),
            item_id: layout.item_id.clone(),
            layout: LayoutItemContract {
                breakpoint: layout.breakpoint.clone(),
                x: layout.x,
                y: layout.y,
                w: layout.w,
                h: layout.h,
                is_static: layout.is_static,
            },
        }
    }
}

impl From<MetricConfigurationAggregate> for MetricsResponse {
    fn from(aggregate: MetricConfigurationAggregate) -> Self {
        Self {
            layouts: aggregate.layouts.iter().map(LayoutItemResponse::from).collect(),
            id: aggregate.id,
            is_editable: aggregate.is_editable,
            records: aggregate.records,
        }
    }
}

impl From<CreateMetricConfigurationRequest> for NewMetricConfiguration {
    fn from(req: CreateMetricConfigurationRequest) -> Self {
        Self {
            is_editable: req.is_editable,
            query_generation_prompt: req.query_generation_prompt,
            layouts: req
                .layouts
                .into_iter()
                .map(|l| NewLayoutItem {
                    breakpoint: l.breakpoint,
                    x: l.x,
                    y: l.y,
                    w: l.w,
                    h: l.h,
                    is_static: l.is_static,
                })
                .collect(),
        }
    }
}

impl From<CreateMetricRecordRequest> for NewMetricRecord {
    fn from(req: CreateMetricRecordRequest) -> Self {
        Self {
            obsolescence_val: req.obsolescence_val,
            obsolescence: req.obsolescence,
            parts_flagged: req.parts_flagged,
            alert_type: req.alert_type,
            alert_category: req.alert_category,
        }
    }
}
