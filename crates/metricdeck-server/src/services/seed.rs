//! Startup seeding.
//!
//! Loaders run concurrently; their batches are then seeded in loader order
//! inside one unit of work with a single commit, so a failure in any batch
//! leaves every table as it was.

use std::sync::Arc;

use futures_util::future::try_join_all;

use metricdeck_core::error::Result;
use metricdeck_core::model::RecordType;

use crate::loaders::SeedLoader;
use crate::persistence::{DataSeeder, SeedOutcome};
use crate::uow::UnitOfWorkFactory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededType {
    pub record_type: RecordType,
    pub outcome: SeedOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub seeded: Vec<SeededType>,
}

impl SeedReport {
    pub fn inserted(&self) -> usize {
        self.seeded.iter().map(|s| s.outcome.inserted()).sum()
    }

    pub fn outcome(&self, record_type: RecordType) -> Option<SeedOutcome> {
        self.seeded
            .iter()
            .find(|s| s.record_type == record_type)
            .map(|s| s.outcome)
    }
}

#[derive(Clone)]
pub struct DataSeedService {
    uow: UnitOfWorkFactory,
    loaders: Vec<Arc<dyn SeedLoader>>,
}

impl DataSeedService {
    pub fn new(uow: UnitOfWorkFactory, loaders: Vec<Arc<dyn SeedLoader>>) -> Self {
        Self { uow, loaders }
    }

    #[tracing::instrument(name = "seed", skip(self), fields(loaders = self.loaders.len()))]
    pub async fn seed(&self) -> Result<SeedReport> {
        let batches = try_join_all(self.loaders.iter().map(|loader| loader.load())).await?;

        let report = self
            .uow
            .scope(move |uow| {
                let seeder = uow.persistence_factory::<dyn DataSeeder>()?;
                let mut report = SeedReport::default();
                for batch in &batches {
                    let outcome = seeder.seed(batch)?;
                    report.seeded.push(SeededType {
                        record_type: batch.record_type(),
                        outcome,
                    });
                }
                uow.commit()?;
                Ok(report)
            })
            .await?;

        tracing::info!(inserted = report.inserted(), "seeding finished");
        Ok(report)
    }
}
