//! Application services.
//!
//! Each service owns a [`UnitOfWorkFactory`](crate::uow::UnitOfWorkFactory)
//! and asks the unit of work for persistence capabilities by trait; none of
//! them names a storage type. "Not found" is reported as `Ok(None)` and
//! mapped to a status code at the transport boundary.

pub mod configuration;
pub mod health;
pub mod metrics;
pub mod records;
pub mod seed;

pub use configuration::{CreateMetricConfigurationService, NewLayoutItem, NewMetricConfiguration};
pub use health::DatabaseHealthCheckService;
pub use metrics::GetMetricsService;
pub use records::{CreateMetricRecordService, NewMetricRecord};
pub use seed::{DataSeedService, SeedReport, SeededType};
