//! Server config loader (strict parsing).

pub mod schema;

use std::fs;

use metricdeck_core::error::{MetricDeckError, Result};

pub use schema::{
    AppConfig, AuthSection, DatabaseSection, LoggingSection, MetricsDefaults, SeedSection,
    ServerSection,
};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "METRICDECK_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "metricdeck.yaml";

/// Config path from `METRICDECK_CONFIG`, falling back to `metricdeck.yaml`.
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetricDeckError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| MetricDeckError::Parse(format!("invalid config yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
