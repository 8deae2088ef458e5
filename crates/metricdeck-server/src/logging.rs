//! Tracing subscriber bootstrap.
//!
//! `RUST_LOG` wins over `logging.filter` so operators can raise verbosity
//! without touching the config file.

use tracing_subscriber::{fmt, EnvFilter};

use metricdeck_core::error::{MetricDeckError, Result};

use crate::config::LoggingSection;

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(cfg: &LoggingSection) -> Result<()> {
    let filter = build_filter(cfg)?;
    let builder = fmt().with_env_filter(filter).with_target(false);

    let installed = if cfg.json {
        builder.json().flatten_event(true).try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| MetricDeckError::Internal(format!("logging init failed: {e}")))
}

fn build_filter(cfg: &LoggingSection) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&cfg.filter)
        .map_err(|e| MetricDeckError::BadRequest(format!("invalid logging.filter: {e}")))
}
