//! Error -> HTTP response mapping.
//!
//! Client errors carry their message and are logged at warn. Everything else
//! is logged at error with its detail and answered with an opaque body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use metricdeck_core::error::{ClientCode, MetricDeckError};

#[derive(Debug)]
pub struct ApiError(pub MetricDeckError);

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl From<MetricDeckError> for ApiError {
    fn from(err: MetricDeckError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(MetricDeckError::BadRequest(message.into()))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self(MetricDeckError::NotFound(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::BadRequest => StatusCode::BAD_REQUEST,
            ClientCode::NotFound => StatusCode::NOT_FOUND,
            ClientCode::AuthFailed => StatusCode::UNAUTHORIZED,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.0.client_code();

        let message = if self.0.is_client_error() {
            tracing::warn!(error = %self.0, status = status.as_u16(), "request rejected");
            self.0.to_string()
        } else {
            tracing::error!(error = %self.0, "request failed");
            "internal server error".to_string()
        };

        let body = ErrorBody {
            error: code.as_str(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
