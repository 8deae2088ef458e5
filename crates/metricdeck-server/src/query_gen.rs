//! Query-template generation for new metric configurations.

use async_trait::async_trait;

use metricdeck_core::error::{MetricDeckError, Result};

/// Turns a natural-language prompt into a stored query template.
///
/// Templates may reference `:start_date`, `:end_date`, `:day_range` and
/// `:query_id`; only the names present are bound at execution time.
#[async_trait]
pub trait QueryGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, query_id: &str) -> Result<String>;
}

/// Returns the same template for every prompt: the metric series tagged with
/// `:query_id`, inside the inclusive `[:start_date, :end_date]` day window.
#[derive(Debug, Default, Clone)]
pub struct TemplateQueryGenerator;

pub const METRIC_SERIES_TEMPLATE: &str = "SELECT date, obsolescence_val, obsolescence, parts_flagged, alert_type, alert_category
FROM metrics
WHERE id = :query_id
  AND date >= :start_date
  AND date < date(:end_date, '+1 day')
ORDER BY date";

impl TemplateQueryGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QueryGenerator for TemplateQueryGenerator {
    async fn generate(&self, prompt: &str, query_id: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(MetricDeckError::BadRequest(
                "query_generation_prompt must not be empty".into(),
            ));
        }
        tracing::debug!(%query_id, prompt_len = prompt.len(), "query template generated");
        Ok(METRIC_SERIES_TEMPLATE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{QueryGenerator, TemplateQueryGenerator, METRIC_SERIES_TEMPLATE};

    #[tokio::test]
    async fn any_prompt_yields_the_series_template() {
        let generator = TemplateQueryGenerator::new();
        let sql = generator.generate("obsolescence by day", "q-1").await.unwrap();
        assert_eq!(sql, METRIC_SERIES_TEMPLATE);
        assert!(sql.contains(":query_id"));
    }

    #[tokio::test]
    async fn blank_prompt_is_rejected() {
        let generator = TemplateQueryGenerator::new();
        assert!(generator.generate("   ", "q-1").await.is_err());
    }
}
