//! `Authorization: Bearer <token>` guard for protected routes.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use metricdeck_core::error::MetricDeckError;

use crate::app_state::AppState;
use crate::transport::error::ApiError;

/// Rejects the request with 401 unless it carries a token the configured
/// verifier accepts. Passes everything through when auth is disabled.
/// Verified [`Claims`](super::Claims) are added to the request extensions.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(verifier) = state.verifier() else {
        return Ok(next.run(request).await);
    };

    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(MetricDeckError::AuthFailed)?;

    let claims = verifier.verify(token).await?;
    tracing::debug!(subject = %claims.subject, key_id = %claims.key_id, "request authenticated");
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
