//! Shared application state.
//!
//! Built once at startup: opens the database, builds the persistence
//! registry, and wires every service to one unit-of-work factory. Startup
//! errors are returned, never panicked on.

use std::sync::Arc;
use std::time::Duration;

use metricdeck_core::error::Result;

use crate::auth::{FileKeySource, KeyCache, KeySetVerifier, TokenVerifier};
use crate::config::AppConfig;
use crate::db::Database;
use crate::loaders;
use crate::persistence;
use crate::query_gen::{QueryGenerator, TemplateQueryGenerator};
use crate::services::{
    CreateMetricConfigurationService, CreateMetricRecordService, DataSeedService,
    DatabaseHealthCheckService, GetMetricsService,
};
use crate::uow::{PersistenceRegistry, UnitOfWorkFactory};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: AppConfig,
    uow: UnitOfWorkFactory,
    health: DatabaseHealthCheckService,
    seed: DataSeedService,
    metrics: GetMetricsService,
    configurations: CreateMetricConfigurationService,
    records: CreateMetricRecordService,
    verifier: Option<Arc<dyn TokenVerifier>>,
}

/// Replaceable collaborators. Defaults are the SQLite registry, the template
/// query generator, and a key-set verifier when `auth.enabled`.
#[derive(Default)]
pub struct Overrides {
    pub registry: Option<PersistenceRegistry>,
    pub generator: Option<Arc<dyn QueryGenerator>>,
    pub verifier: Option<Arc<dyn TokenVerifier>>,
}

impl AppState {
    pub fn new(cfg: AppConfig) -> Result<Self> {
        Self::with_overrides(cfg, Overrides::default())
    }

    pub fn with_overrides(cfg: AppConfig, overrides: Overrides) -> Result<Self> {
        let db = Database::open(&cfg.database)?;
        let registry = Arc::new(
            overrides
                .registry
                .unwrap_or_else(persistence::sqlite_registry),
        );
        let uow = UnitOfWorkFactory::new(db, registry);

        let generator: Arc<dyn QueryGenerator> = match overrides.generator {
            Some(g) => g,
            None => Arc::new(TemplateQueryGenerator::new()),
        };

        let verifier = match overrides.verifier {
            Some(v) => Some(v),
            None => default_verifier(&cfg),
        };

        let inner = AppStateInner {
            health: DatabaseHealthCheckService::new(uow.clone()),
            seed: DataSeedService::new(uow.clone(), loaders::default_loaders(&cfg.seed)),
            metrics: GetMetricsService::new(uow.clone()),
            configurations: CreateMetricConfigurationService::new(uow.clone(), generator),
            records: CreateMetricRecordService::new(uow.clone()),
            uow,
            verifier,
            cfg,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn uow(&self) -> &UnitOfWorkFactory {
        &self.inner.uow
    }

    pub fn health(&self) -> &DatabaseHealthCheckService {
        &self.inner.health
    }

    pub fn seed(&self) -> &DataSeedService {
        &self.inner.seed
    }

    pub fn metrics(&self) -> &GetMetricsService {
        &self.inner.metrics
    }

    pub fn configurations(&self) -> &CreateMetricConfigurationService {
        &self.inner.configurations
    }

    pub fn records(&self) -> &CreateMetricRecordService {
        &self.inner.records
    }

    /// `None` when requests are not authenticated.
    pub fn verifier(&self) -> Option<Arc<dyn TokenVerifier>> {
        self.inner.verifier.clone()
    }
}

fn default_verifier(cfg: &AppConfig) -> Option<Arc<dyn TokenVerifier>> {
    if !cfg.auth.enabled {
        return None;
    }
    let keys_file = cfg.auth.keys_file.clone()?;
    let cache = KeyCache::new(
        Arc::new(FileKeySource::new(keys_file)),
        Duration::from_secs(cfg.auth.key_ttl_secs),
    )
    .with_min_refresh(Duration::from_secs(cfg.auth.key_min_refresh_secs));
    Some(Arc::new(KeySetVerifier::new(cache)))
}
