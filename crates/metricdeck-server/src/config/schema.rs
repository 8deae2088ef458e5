use std::net::SocketAddr;

use chrono::NaiveDate;
use serde::Deserialize;
use metricdeck_core::error::{MetricDeckError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    pub database: DatabaseSection,

    #[serde(default)]
    pub seed: SeedSection,

    #[serde(default)]
    pub auth: AuthSection,

    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub metrics_defaults: MetricsDefaults,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricDeckError::Internal(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.metrics_defaults.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            MetricDeckError::Internal(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    /// SQLite database file. Created on first open.
    pub path: String,

    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl DatabaseSection {
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(MetricDeckError::Internal(
                "database.path must not be empty".into(),
            ));
        }
        if !(100..=60000).contains(&self.busy_timeout_ms) {
            return Err(MetricDeckError::Internal(
                "database.busy_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

/// Seed sources. Missing files are tolerated at load time.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSection {
    #[serde(default = "default_true")]
    pub on_startup: bool,

    #[serde(default = "default_metrics_json")]
    pub metrics_json: String,

    #[serde(default = "default_metric_records_json")]
    pub metric_records_json: String,

    #[serde(default = "default_queries_csv")]
    pub queries_csv: String,
}

impl Default for SeedSection {
    fn default() -> Self {
        Self {
            on_startup: true,
            metrics_json: default_metrics_json(),
            metric_records_json: default_metric_records_json(),
            queries_csv: default_queries_csv(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_metrics_json() -> String {
    "seed/metrics.json".into()
}
fn default_metric_records_json() -> String {
    "seed/metric_records.json".into()
}
fn default_queries_csv() -> String {
    "seed/queries.csv".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    #[serde(default)]
    pub enabled: bool,

    /// YAML key set consumed by `FileKeySource`.
    #[serde(default)]
    pub keys_file: Option<String>,

    #[serde(default = "default_key_ttl_secs")]
    pub key_ttl_secs: u64,

    /// Shortest interval between refetches forced by unknown tokens.
    #[serde(default = "default_key_min_refresh_secs")]
    pub key_min_refresh_secs: u64,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            enabled: false,
            keys_file: None,
            key_ttl_secs: default_key_ttl_secs(),
            key_min_refresh_secs: default_key_min_refresh_secs(),
        }
    }
}

impl AuthSection {
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.keys_file.as_deref().map_or(true, |p| p.trim().is_empty()) {
            return Err(MetricDeckError::Internal(
                "auth.keys_file is required when auth.enabled".into(),
            ));
        }
        if self.key_ttl_secs == 0 {
            return Err(MetricDeckError::Internal(
                "auth.key_ttl_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn default_key_ttl_secs() -> u64 {
    300
}
fn default_key_min_refresh_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_filter")]
    pub filter: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

fn default_filter() -> String {
    "info".into()
}

/// Window used by `GET /metrics/:id` when the caller omits query parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsDefaults {
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,

    #[serde(default = "default_day_range")]
    pub day_range: i64,
}

impl Default for MetricsDefaults {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: default_end_date(),
            day_range: default_day_range(),
        }
    }
}

impl MetricsDefaults {
    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(MetricDeckError::Internal(
                "metrics_defaults.start_date must not be after end_date".into(),
            ));
        }
        if self.day_range < 0 {
            return Err(MetricDeckError::Internal(
                "metrics_defaults.day_range must not be negative".into(),
            ));
        }
        Ok(())
    }
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default()
}
fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap_or_default()
}
fn default_day_range() -> i64 {
    30
}
