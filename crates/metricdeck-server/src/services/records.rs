use chrono::Utc;

use metricdeck_core::error::Result;
use metricdeck_core::model::{new_id, MetricRecord};

use crate::persistence::{MetricConfigurationReader, MetricRecordWriter};
use crate::uow::UnitOfWorkFactory;

/// Measurement values supplied by the caller. Identity and timestamp are
/// assigned by the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMetricRecord {
    pub obsolescence_val: Option<f64>,
    pub obsolescence: Option<f64>,
    pub parts_flagged: Option<i64>,
    pub alert_type: Option<String>,
    pub alert_category: Option<String>,
}

#[derive(Clone)]
pub struct CreateMetricRecordService {
    uow: UnitOfWorkFactory,
}

impl CreateMetricRecordService {
    pub fn new(uow: UnitOfWorkFactory) -> Self {
        Self { uow }
    }

    /// Appends a record to the series of configuration `configuration_id`.
    /// `Ok(None)` when the configuration does not exist; nothing is written.
    pub async fn create(
        &self,
        configuration_id: &str,
        input: NewMetricRecord,
    ) -> Result<Option<String>> {
        let configuration_id = configuration_id.to_string();
        self.uow
            .scope(move |uow| {
                // Writer first: the existence check then runs under the write lock.
                let writer = uow.persistence_factory::<dyn MetricRecordWriter>()?;
                let reader = uow.persistence_factory::<dyn MetricConfigurationReader>()?;
                let Some(configuration) = reader.get_configuration(&configuration_id)? else {
                    return Ok(None);
                };

                let record = MetricRecord {
                    metric_id: new_id(),
                    id: configuration.query_id.clone(),
                    date: Some(Utc::now().naive_utc()),
                    obsolescence_val: input.obsolescence_val,
                    obsolescence: input.obsolescence,
                    parts_flagged: input.parts_flagged,
                    alert_type: input.alert_type,
                    alert_category: input.alert_category,
                };

                writer.add_record(&record)?;
                uow.commit()?;

                tracing::info!(
                    configuration_id = %configuration.id,
                    metric_id = %record.metric_id,
                    "metric record created"
                );
                Ok(Some(configuration.id))
            })
            .await
    }
}
