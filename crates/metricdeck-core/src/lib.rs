//! metricdeck core: storage-agnostic domain records and the shared error type.
//!
//! This crate defines the data model (metric configurations, layouts, queries,
//! time-series records) and the error surface shared by the server and any
//! tooling. It carries no runtime, storage, or transport dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `MetricDeckError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;

pub use error::{ClientCode, MetricDeckError, Result};
pub use model::{
    new_id, LayoutItem, MetricConfiguration, MetricConfigurationAggregate, MetricRecord, Query,
    RecordType, Row, SeedBatch,
};
