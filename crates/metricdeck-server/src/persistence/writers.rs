//! Write-side capabilities. Writes are staged in the unit of work's
//! transaction and become durable on commit.

use rusqlite::{params, Connection};

use metricdeck_core::error::Result;
use metricdeck_core::model::{
    LayoutItem, MetricConfiguration, MetricConfigurationAggregate, MetricRecord, Query,
};

use super::{MetricAggregateWriter, MetricRecordWriter};
use crate::db::StorageResultExt;
use crate::uow::Session;

pub fn aggregate_writer(session: &Session) -> Box<dyn MetricAggregateWriter + '_> {
    Box::new(SqliteMetricAggregateWriter::new(session))
}

pub fn record_writer(session: &Session) -> Box<dyn MetricRecordWriter + '_> {
    Box::new(SqliteMetricRecordWriter::new(session))
}

pub struct SqliteMetricAggregateWriter<'s> {
    conn: &'s Connection,
}

impl<'s> SqliteMetricAggregateWriter<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            conn: session.conn(),
        }
    }
}

impl MetricAggregateWriter for SqliteMetricAggregateWriter<'_> {
    fn add_aggregate(&self, aggregate: &MetricConfigurationAggregate) -> Result<()> {
        if let Some(query) = &aggregate.query {
            insert_query(self.conn, query)?;
        }
        insert_configuration(self.conn, &aggregate.configuration())?;
        for layout in &aggregate.layouts {
            insert_layout(self.conn, layout)?;
        }
        Ok(())
    }
}

pub struct SqliteMetricRecordWriter<'s> {
    conn: &'s Connection,
}

impl<'s> SqliteMetricRecordWriter<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            conn: session.conn(),
        }
    }
}

impl MetricRecordWriter for SqliteMetricRecordWriter<'_> {
    fn add_record(&self, record: &MetricRecord) -> Result<()> {
        insert_metric_record(self.conn, record)
    }
}

pub(crate) fn insert_query(conn: &Connection, query: &Query) -> Result<()> {
    conn.prepare_cached("INSERT INTO queries (id, query) VALUES (?1, ?2)")
        .storage("prepare query insert")?
        .execute(params![query.id, query.query])
        .storage("insert query")?;
    Ok(())
}

pub(crate) fn insert_configuration(conn: &Connection, cfg: &MetricConfiguration) -> Result<()> {
    conn.prepare_cached(
        "INSERT INTO metric_configurations (id, query_id, is_editable) VALUES (?1, ?2, ?3)",
    )
    .storage("prepare configuration insert")?
    .execute(params![cfg.id, cfg.query_id, cfg.is_editable])
    .storage("insert configuration")?;
    Ok(())
}

pub(crate) fn insert_layout(conn: &Connection, layout: &LayoutItem) -> Result<()> {
    conn.prepare_cached(
        "INSERT INTO layout_items (id, item_id, breakpoint, x, y, w, h, static)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .storage("prepare layout insert")?
    .execute(params![
        layout.id,
        layout.item_id,
        layout.breakpoint,
        layout.x,
        layout.y,
        layout.w,
        layout.h,
        layout.is_static,
    ])
    .storage("insert layout")?;
    Ok(())
}

pub(crate) fn insert_metric_record(conn: &Connection, record: &MetricRecord) -> Result<()> {
    conn.prepare_cached(
        "INSERT INTO metrics (
            metric_id, id, date, obsolescence_val, obsolescence,
            parts_flagged, alert_type, alert_category
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .storage("prepare metric insert")?
    .execute(params![
        record.metric_id,
        record.id,
        record.date,
        record.obsolescence_val,
        record.obsolescence,
        record.parts_flagged,
        record.alert_type,
        record.alert_category,
    ])
    .storage("insert metric")?;
    Ok(())
}
