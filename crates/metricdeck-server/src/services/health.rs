use metricdeck_core::error::Result;

use crate::persistence::DbHealthReader;
use crate::uow::UnitOfWorkFactory;

#[derive(Clone)]
pub struct DatabaseHealthCheckService {
    uow: UnitOfWorkFactory,
}

impl DatabaseHealthCheckService {
    pub fn new(uow: UnitOfWorkFactory) -> Self {
        Self { uow }
    }

    /// `true` when the storage ping returns a row. Storage errors are
    /// returned, not folded into `false`.
    pub async fn check(&self) -> Result<bool> {
        self.uow
            .scope(|uow| {
                let reader = uow.persistence_factory::<dyn DbHealthReader>()?;
                Ok(reader.ping()?.is_some())
            })
            .await
    }
}
