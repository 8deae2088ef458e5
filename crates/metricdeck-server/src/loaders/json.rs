//! JSON seed sources.
//!
//! The metrics document has the shape
//! `{"items": [{id, queryId|query_id, isEditable}], "layouts": {<breakpoint>: [{i, x, y, w, h, static?}]}}`;
//! the metric-records document is an array of record objects with ISO-8601
//! dates.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use metricdeck_core::error::{MetricDeckError, Result};
use metricdeck_core::model::{
    new_id, LayoutItem, MetricConfiguration, MetricRecord, RecordType, SeedBatch,
};

use super::remap::{remap_duplicate_ids, DUPLICATE_ID_REMAP};
use super::{read_optional, SeedLoader};

#[derive(Debug, Deserialize)]
struct ItemsDocument {
    #[serde(default)]
    items: Vec<SeedItem>,
}

#[derive(Debug, Deserialize)]
struct SeedItem {
    id: String,
    #[serde(default, rename = "queryId", alias = "query_id")]
    query_id: Option<String>,
    #[serde(rename = "isEditable")]
    is_editable: bool,
}

#[derive(Debug, Deserialize)]
struct LayoutsDocument {
    #[serde(default, deserialize_with = "breakpoints_in_document_order")]
    layouts: Vec<(String, Vec<SeedLayout>)>,
}

/// Keeps breakpoints in the order the document lists them.
fn breakpoints_in_document_order<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<(String, Vec<SeedLayout>)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Breakpoints;

    impl<'de> Visitor<'de> for Breakpoints {
        type Value = Vec<(String, Vec<SeedLayout>)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object of breakpoint -> layout list")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Vec<SeedLayout>>()? {
                out.push(entry);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(Breakpoints)
}

#[derive(Debug, Deserialize)]
struct SeedLayout {
    i: String,
    x: i64,
    y: i64,
    w: i64,
    h: i64,
    #[serde(default, rename = "static")]
    is_static: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SeedMetricRecord {
    #[serde(default)]
    id: Option<String>,
    date: String,
    #[serde(default)]
    obsolescence_val: Option<f64>,
    #[serde(default)]
    obsolescence: Option<f64>,
    #[serde(default)]
    parts_flagged: Option<i64>,
    #[serde(default)]
    alert_type: Option<String>,
    #[serde(default)]
    alert_category: Option<String>,
}

fn parse_document<T: for<'de> Deserialize<'de>>(path: &Path, contents: &str) -> Result<T> {
    serde_json::from_str(contents)
        .map_err(|e| MetricDeckError::Parse(format!("{}: {e}", path.display())))
}

/// Configurations from `items`, with known duplicate ids remapped.
pub struct JsonMetricConfigurationLoader {
    path: PathBuf,
}

impl JsonMetricConfigurationLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeedLoader for JsonMetricConfigurationLoader {
    fn record_type(&self) -> RecordType {
        RecordType::MetricConfiguration
    }

    async fn load(&self) -> Result<SeedBatch> {
        let Some(contents) = read_optional(&self.path, self.record_type()).await? else {
            return Ok(SeedBatch::empty(self.record_type()));
        };
        let doc: ItemsDocument = parse_document(&self.path, &contents)?;

        let items = remap_duplicate_ids(doc.items, |item| &mut item.id, DUPLICATE_ID_REMAP);
        let configurations = items
            .into_iter()
            .map(|item| MetricConfiguration {
                id: item.id,
                query_id: item.query_id,
                is_editable: item.is_editable,
            })
            .collect();

        Ok(SeedBatch::MetricConfigurations(configurations))
    }
}

/// Layout items from `layouts`, one fresh id per entry.
pub struct JsonLayoutItemLoader {
    path: PathBuf,
}

impl JsonLayoutItemLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeedLoader for JsonLayoutItemLoader {
    fn record_type(&self) -> RecordType {
        RecordType::LayoutItem
    }

    async fn load(&self) -> Result<SeedBatch> {
        let Some(contents) = read_optional(&self.path, self.record_type()).await? else {
            return Ok(SeedBatch::empty(self.record_type()));
        };
        Ok(SeedBatch::LayoutItems(parse_layouts(&self.path, &contents)?))
    }
}

fn parse_layouts(path: &Path, contents: &str) -> Result<Vec<LayoutItem>> {
    let doc: LayoutsDocument = parse_document(path, contents)?;

    let mut layouts = Vec::new();
    for (breakpoint, entries) in doc.layouts {
        for entry in entries {
            layouts.push(LayoutItem {
                id: new_id(),
                item_id: entry.i,
                breakpoint: breakpoint.clone(),
                x: entry.x,
                y: entry.y,
                w: entry.w,
                h: entry.h,
                is_static: entry.is_static,
            });
        }
    }
    Ok(layouts)
}

/// Time-series rows, one fresh `metric_id` per entry.
pub struct JsonMetricRecordLoader {
    path: PathBuf,
}

impl JsonMetricRecordLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeedLoader for JsonMetricRecordLoader {
    fn record_type(&self) -> RecordType {
        RecordType::MetricRecord
    }

    async fn load(&self) -> Result<SeedBatch> {
        let Some(contents) = read_optional(&self.path, self.record_type()).await? else {
            return Ok(SeedBatch::empty(self.record_type()));
        };
        let entries: Vec<SeedMetricRecord> = parse_document(&self.path, &contents)?;

        let records = entries
            .into_iter()
            .map(|entry| {
                let date = parse_iso_datetime(&entry.date).ok_or_else(|| {
                    MetricDeckError::Parse(format!(
                        "{}: invalid ISO-8601 date `{}`",
                        self.path.display(),
                        entry.date
                    ))
                })?;
                Ok(MetricRecord {
                    metric_id: new_id(),
                    id: entry.id,
                    date: Some(date),
                    obsolescence_val: entry.obsolescence_val,
                    obsolescence: entry.obsolescence,
                    parts_flagged: entry.parts_flagged,
                    alert_type: entry.alert_type,
                    alert_category: entry.alert_category,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SeedBatch::MetricRecords(records))
    }
}

/// Accepts RFC 3339 (offset converted to UTC), naive date-times with `T` or
/// space separators, and bare dates (midnight).
pub fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
