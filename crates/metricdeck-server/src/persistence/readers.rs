//! Read-side capabilities.

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension, ToSql};
use serde_json::Value;

use metricdeck_core::error::Result;
use metricdeck_core::model::{
    LayoutItem, MetricConfiguration, MetricConfigurationAggregate, Query, Row,
};

use super::{
    DbHealthReader, MetricAggregateReader, MetricConfigurationReader, MetricRecordsReader,
    RecordsParams,
};
use crate::db::StorageResultExt;
use crate::uow::Session;

pub fn health_reader(session: &Session) -> Box<dyn DbHealthReader + '_> {
    Box::new(SqliteDbHealthReader::new(session))
}

pub fn aggregate_reader(session: &Session) -> Box<dyn MetricAggregateReader + '_> {
    Box::new(SqliteMetricAggregateReader::new(session))
}

pub fn configuration_reader(session: &Session) -> Box<dyn MetricConfigurationReader + '_> {
    Box::new(SqliteMetricConfigurationReader::new(session))
}

pub fn records_reader(session: &Session) -> Box<dyn MetricRecordsReader + '_> {
    Box::new(SqliteMetricRecordsReader::new(session))
}

pub struct SqliteDbHealthReader<'s> {
    conn: &'s Connection,
}

impl<'s> SqliteDbHealthReader<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            conn: session.conn(),
        }
    }
}

impl DbHealthReader for SqliteDbHealthReader<'_> {
    fn ping(&self) -> Result<Option<i64>> {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .optional()
            .storage("health ping")
    }
}

pub struct SqliteMetricConfigurationReader<'s> {
    conn: &'s Connection,
}

impl<'s> SqliteMetricConfigurationReader<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            conn: session.conn(),
        }
    }
}

impl MetricConfigurationReader for SqliteMetricConfigurationReader<'_> {
    fn get_configuration(&self, id: &str) -> Result<Option<MetricConfiguration>> {
        select_configuration(self.conn, id)
    }
}

/// Loads a configuration together with its layouts and query.
pub struct SqliteMetricAggregateReader<'s> {
    conn: &'s Connection,
}

impl<'s> SqliteMetricAggregateReader<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            conn: session.conn(),
        }
    }

    fn layouts_for(&self, item_id: &str) -> Result<Vec<LayoutItem>> {
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT id, item_id, breakpoint, x, y, w, h, static
                 FROM layout_items
                 WHERE item_id = ?1
                 ORDER BY rowid",
            )
            .storage("prepare layouts")?;

        let layouts = stmt
            .query_map([item_id], |row| {
                Ok(LayoutItem {
                    id: row.get("id")?,
                    item_id: row.get("item_id")?,
                    breakpoint: row.get("breakpoint")?,
                    x: row.get("x")?,
                    y: row.get("y")?,
                    w: row.get("w")?,
                    h: row.get("h")?,
                    is_static: row.get("static")?,
                })
            })
            .storage("query layouts")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .storage("read layouts")?;
        Ok(layouts)
    }

    fn query_by_id(&self, id: &str) -> Result<Option<Query>> {
        self.conn
            .query_row("SELECT id, query FROM queries WHERE id = ?1", [id], |row| {
                Ok(Query {
                    id: row.get("id")?,
                    query: row.get("query")?,
                })
            })
            .optional()
            .storage("query by id")
    }
}

impl MetricAggregateReader for SqliteMetricAggregateReader<'_> {
    fn get_aggregate(&self, id: &str) -> Result<Option<MetricConfigurationAggregate>> {
        let Some(configuration) = select_configuration(self.conn, id)? else {
            return Ok(None);
        };

        let layouts = self.layouts_for(&configuration.id)?;
        let query = match configuration.query_id.as_deref() {
            Some(query_id) => self.query_by_id(query_id)?,
            None => None,
        };

        Ok(Some(MetricConfigurationAggregate {
            id: configuration.id,
            query_id: configuration.query_id,
            is_editable: configuration.is_editable,
            layouts,
            query,
            records: Vec::new(),
        }))
    }
}

/// Runs stored query templates with named parameters.
pub struct SqliteMetricRecordsReader<'s> {
    conn: &'s Connection,
}

impl<'s> SqliteMetricRecordsReader<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            conn: session.conn(),
        }
    }
}

impl MetricRecordsReader for SqliteMetricRecordsReader<'_> {
    fn fetch_records(&self, template: &str, params: &RecordsParams) -> Result<Vec<Row>> {
        let mut stmt = self
            .conn
            .prepare(template)
            .storage("prepare records query")?;

        let candidates: [(&str, &dyn ToSql); 4] = [
            (":start_date", &params.window.start_date as &dyn ToSql),
            (":end_date", &params.window.end_date as &dyn ToSql),
            (":day_range", &params.window.day_range as &dyn ToSql),
            (":query_id", &params.query_id as &dyn ToSql),
        ];
        // Binding a name the template does not declare is an error in SQLite.
        let mut named: Vec<(&str, &dyn ToSql)> = Vec::with_capacity(candidates.len());
        for (name, value) in candidates {
            if stmt
                .parameter_index(name)
                .storage("inspect records query")?
                .is_some()
            {
                named.push((name, value));
            }
        }

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt
            .query(named.as_slice())
            .storage("execute records query")?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().storage("read records row")? {
            let mut record = Row::new();
            for (idx, name) in columns.iter().enumerate() {
                let value = row.get_ref(idx).storage("read records column")?;
                record.insert(name.clone(), sql_to_json(value));
            }
            out.push(record);
        }
        Ok(out)
    }
}

fn select_configuration(conn: &Connection, id: &str) -> Result<Option<MetricConfiguration>> {
    conn.query_row(
        "SELECT id, query_id, is_editable FROM metric_configurations WHERE id = ?1",
        [id],
        |row| {
            Ok(MetricConfiguration {
                id: row.get("id")?,
                query_id: row.get("query_id")?,
                is_editable: row.get("is_editable")?,
            })
        },
    )
    .optional()
    .storage("select configuration")
}

fn sql_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Array(b.iter().map(|byte| Value::from(*byte)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::sql_to_json;
    use rusqlite::types::ValueRef;
    use serde_json::json;

    #[test]
    fn sql_values_map_to_json() {
        assert_eq!(sql_to_json(ValueRef::Null), json!(null));
        assert_eq!(sql_to_json(ValueRef::Integer(7)), json!(7));
        assert_eq!(sql_to_json(ValueRef::Real(80.25)), json!(80.25));
        assert_eq!(sql_to_json(ValueRef::Real(f64::NAN)), json!(null));
        assert_eq!(sql_to_json(ValueRef::Text(b"lg")), json!("lg"));
    }
}
