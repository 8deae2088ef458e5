//! Shared error type across metricdeck crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Requested resource does not exist.
    NotFound,
    /// Missing or rejected credentials.
    AuthFailed,
    /// Anything the client cannot act on.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricDeckError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum MetricDeckError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("auth failed")]
    AuthFailed,
    /// A persistence capability was resolved before anything registered it.
    #[error("no implementation registered for capability `{0}`")]
    Unregistered(&'static str),
    /// Seed, key or config file content could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
    #[error("storage: {0}")]
    Storage(String),
    #[error("io: {0}")]
    Io(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MetricDeckError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            MetricDeckError::BadRequest(_) => ClientCode::BadRequest,
            MetricDeckError::NotFound(_) => ClientCode::NotFound,
            MetricDeckError::AuthFailed => ClientCode::AuthFailed,
            MetricDeckError::Unregistered(_)
            | MetricDeckError::Parse(_)
            | MetricDeckError::Storage(_)
            | MetricDeckError::Io(_)
            | MetricDeckError::Internal(_) => ClientCode::Internal,
        }
    }

    /// True for conditions that degrade gracefully at the boundary
    /// (client errors) rather than failing opaquely.
    pub fn is_client_error(&self) -> bool {
        !matches!(self.client_code(), ClientCode::Internal)
    }
}

impl From<std::io::Error> for MetricDeckError {
    fn from(value: std::io::Error) -> Self {
        MetricDeckError::Io(value.to_string())
    }
}

impl From<serde_json::Error> for MetricDeckError {
    fn from(value: serde_json::Error) -> Self {
        MetricDeckError::Parse(value.to_string())
    }
}
