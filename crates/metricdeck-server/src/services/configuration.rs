use std::sync::Arc;

use metricdeck_core::error::Result;
use metricdeck_core::model::{new_id, LayoutItem, MetricConfigurationAggregate, Query};

use crate::persistence::MetricAggregateWriter;
use crate::query_gen::QueryGenerator;
use crate::uow::UnitOfWorkFactory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLayoutItem {
    pub breakpoint: String,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
    pub is_static: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMetricConfiguration {
    pub is_editable: bool,
    pub query_generation_prompt: String,
    pub layouts: Vec<NewLayoutItem>,
}

#[derive(Clone)]
pub struct CreateMetricConfigurationService {
    uow: UnitOfWorkFactory,
    generator: Arc<dyn QueryGenerator>,
}

impl CreateMetricConfigurationService {
    pub fn new(uow: UnitOfWorkFactory, generator: Arc<dyn QueryGenerator>) -> Self {
        Self { uow, generator }
    }

    /// Generates the query template, then persists query, configuration and
    /// layouts in one commit. Returns the new configuration id.
    pub async fn create(&self, input: NewMetricConfiguration) -> Result<String> {
        let id = new_id();
        let query_id = new_id();
        let template = self
            .generator
            .generate(&input.query_generation_prompt, &query_id)
            .await?;

        let mut aggregate = MetricConfigurationAggregate {
            id: id.clone(),
            is_editable: input.is_editable,
            layouts: input
                .layouts
                .into_iter()
                .map(|l| LayoutItem {
                    id: new_id(),
                    item_id: id.clone(),
                    breakpoint: l.breakpoint,
                    x: l.x,
                    y: l.y,
                    w: l.w,
                    h: l.h,
                    is_static: l.is_static,
                })
                .collect(),
            ..Default::default()
        };
        aggregate.attach_query(Query {
            id: query_id,
            query: template,
        });

        self.uow
            .scope(move |uow| {
                let writer = uow.persistence_factory::<dyn MetricAggregateWriter>()?;
                writer.add_aggregate(&aggregate)?;
                uow.commit()
            })
            .await?;

        tracing::info!(configuration_id = %id, "metric configuration created");
        Ok(id)
    }
}
