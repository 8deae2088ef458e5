//! Metric endpoints.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::persistence::RecordsWindow;
use crate::transport::contracts::{
    CreateMetricConfigurationRequest, CreateMetricRecordRequest, CreatedResponse, MetricsQuery,
    MetricsResponse,
};
use crate::transport::error::ApiError;

fn parse_id(raw: &str) -> Result<String, ApiError> {
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| ApiError::bad_request(format!("`{raw}` is not a valid UUID")))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

#[tracing::instrument(
    name = "operation",
    skip(state, query),
    fields(operation = "get_metrics", start_date, end_date, day_range)
)]
pub async fn get_metrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<MetricsQuery>, QueryRejection>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let id = parse_id(&id)?;
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    if query.day_range.is_some_and(|days| days < 0) {
        return Err(ApiError::bad_request("day_range must not be negative"));
    }

    let defaults = &state.cfg().metrics_defaults;
    let window = RecordsWindow {
        start_date: query.start_date.unwrap_or(defaults.start_date),
        end_date: query.end_date.unwrap_or(defaults.end_date),
        day_range: query.day_range.unwrap_or(defaults.day_range),
    };
    let span = tracing::Span::current();
    span.record("start_date", tracing::field::display(window.start_date));
    span.record("end_date", tracing::field::display(window.end_date));
    span.record("day_range", window.day_range);
    tracing::info!("endpoint called");

    match state.metrics().get(&id, window).await? {
        Some(aggregate) => Ok(Json(MetricsResponse::from(aggregate))),
        None => Err(ApiError::not_found("metrics not found")),
    }
}

#[tracing::instrument(
    name = "operation",
    skip(state, payload),
    fields(operation = "create_metric_configuration")
)]
pub async fn create_metric_configuration(
    State(state): State<AppState>,
    payload: Result<Json<CreateMetricConfigurationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let request = body(payload)?;
    tracing::info!(
        is_editable = request.is_editable,
        query_generation_prompt = %request.query_generation_prompt,
        "endpoint called"
    );

    let id = state.configurations().create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[tracing::instrument(
    name = "operation",
    skip(state, payload),
    fields(operation = "create_metric_record")
)]
pub async fn create_metric_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateMetricRecordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = parse_id(&id)?;
    let request = body(payload)?;
    tracing::info!("endpoint called");

    match state.records().create(&id, request.into()).await? {
        Some(id) => Ok((StatusCode::CREATED, Json(CreatedResponse { id }))),
        None => Err(ApiError::not_found("metric configuration not found")),
    }
}
