//! Seed data loaders.
//!
//! Each loader reads one external source into a typed [`SeedBatch`].
//!
//! # Contract
//! - A missing source file is logged as a warning and yields an empty batch.
//! - Malformed content in an existing file is a `Parse` error.
//! - Loaders share no mutable state and may run concurrently.

pub mod delimited;
pub mod json;
pub mod remap;

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use metricdeck_core::error::Result;
use metricdeck_core::model::{RecordType, SeedBatch};

use crate::config::SeedSection;

pub use delimited::CsvQueryLoader;
pub use json::{JsonLayoutItemLoader, JsonMetricConfigurationLoader, JsonMetricRecordLoader};

#[async_trait]
pub trait SeedLoader: Send + Sync {
    /// Record kind this loader produces.
    fn record_type(&self) -> RecordType;
    async fn load(&self) -> Result<SeedBatch>;
}

/// Loaders for every configured seed source, in seeding order.
pub fn default_loaders(cfg: &SeedSection) -> Vec<Arc<dyn SeedLoader>> {
    vec![
        Arc::new(JsonMetricConfigurationLoader::new(&cfg.metrics_json)),
        Arc::new(JsonLayoutItemLoader::new(&cfg.metrics_json)),
        Arc::new(CsvQueryLoader::new(&cfg.queries_csv)),
        Arc::new(JsonMetricRecordLoader::new(&cfg.metric_records_json)),
    ]
}

/// Reads `path`, or returns `None` (with a warning) when it does not exist.
pub(crate) async fn read_optional(path: &Path, record_type: RecordType) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(
                path = %path.display(),
                %record_type,
                "seed file not found; nothing to load"
            );
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
