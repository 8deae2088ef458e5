use metricdeck_core::error::Result;
use metricdeck_core::model::MetricConfigurationAggregate;

use crate::persistence::{MetricAggregateReader, MetricRecordsReader, RecordsParams, RecordsWindow};
use crate::uow::UnitOfWorkFactory;

/// Reads a configuration aggregate and runs its stored query over a window.
#[derive(Clone)]
pub struct GetMetricsService {
    uow: UnitOfWorkFactory,
}

impl GetMetricsService {
    pub fn new(uow: UnitOfWorkFactory) -> Self {
        Self { uow }
    }

    pub async fn get(
        &self,
        id: &str,
        window: RecordsWindow,
    ) -> Result<Option<MetricConfigurationAggregate>> {
        let id = id.to_string();
        self.uow
            .scope(move |uow| {
                let reader = uow.persistence_factory::<dyn MetricAggregateReader>()?;
                let Some(mut aggregate) = reader.get_aggregate(&id)? else {
                    return Ok(None);
                };

                match aggregate.query.as_ref() {
                    Some(query) => {
                        let params = RecordsParams {
                            query_id: aggregate.query_id.clone(),
                            window,
                        };
                        let records = uow.persistence_factory::<dyn MetricRecordsReader>()?;
                        aggregate.records = records.fetch_records(&query.query, &params)?;
                    }
                    None => {
                        tracing::warn!(
                            configuration_id = %aggregate.id,
                            query_id = ?aggregate.query_id,
                            "configuration has no stored query; returning no records"
                        );
                    }
                }

                Ok(Some(aggregate))
            })
            .await
    }
}
