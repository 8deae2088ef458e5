//! Delimited-text seed source for query templates (`id`, `query` columns).
//! Quoted fields may span lines.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use metricdeck_core::error::{MetricDeckError, Result};
use metricdeck_core::model::{Query, RecordType, SeedBatch};

use super::{read_optional, SeedLoader};

#[derive(Debug, Deserialize)]
struct QueryRow {
    id: String,
    query: String,
}

pub struct CsvQueryLoader {
    path: PathBuf,
}

impl CsvQueryLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeedLoader for CsvQueryLoader {
    fn record_type(&self) -> RecordType {
        RecordType::Query
    }

    async fn load(&self) -> Result<SeedBatch> {
        let Some(contents) = read_optional(&self.path, self.record_type()).await? else {
            return Ok(SeedBatch::empty(self.record_type()));
        };

        let queries = parse_queries(&contents).map_err(|e| {
            MetricDeckError::Parse(format!("{}: {e}", self.path.display()))
        })?;
        Ok(SeedBatch::Queries(queries))
    }
}

fn parse_queries(contents: &str) -> std::result::Result<Vec<Query>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(contents.as_bytes());

    reader
        .deserialize::<QueryRow>()
        .map(|row| row.map(|r| Query { id: r.id, query: r.query }))
        .collect()
}
