//! Axum router wiring.
//!
//! `/health` is always open; metric routes sit behind the bearer guard,
//! which is a pass-through when auth is disabled.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, auth, ops, transport::handlers};

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/metrics/:id", get(handlers::get_metrics))
        .route("/metrics/:id/records", post(handlers::create_metric_record))
        .route(
            "/metric-configuration",
            post(handlers::create_metric_configuration),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .route("/health", get(ops::health))
        .merge(protected)
        .with_state(state)
}
